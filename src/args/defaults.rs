pub(crate) const DEFAULT_USER_AGENT: &str = concat!("tickburst/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_TARGET_URL: &str = "https://postman-echo.com/post";
