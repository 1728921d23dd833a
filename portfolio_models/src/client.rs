use std::net::IpAddr;

/// Address of the client that sent a request, used as the rate limiting key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientAddress {
    Ip(IpAddr),
    /// Neither a trusted forwarded-for header nor the socket peer address was
    /// available.
    Unknown,
}

impl From<IpAddr> for ClientAddress {
    fn from(value: IpAddr) -> Self {
        Self::Ip(value)
    }
}

impl std::fmt::Display for ClientAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ip(ip) => ip.fmt(f),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
