use std::fmt;

const FLOW: &str = "xtls-rprx-vision";
const TRANSPORT: &str = "raw";
const SECURITY: &str = "reality";
const FINGERPRINT: &str = "edge";

/// VLESS+REALITY share link clients import to reach the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlessLink<'a> {
    pub client_id: &'a str,
    pub address: &'a str,
    pub port: u16,
    pub server_name: &'a str,
    pub public_key: &'a str,
    pub short_id: &'a str,
    pub name: &'a str,
}

impl fmt::Display for VlessLink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vless://{}@", self.client_id)?;
        if self.address.contains(':') {
            write!(f, "[{}]", self.address)?;
        } else {
            f.write_str(self.address)?;
        }
        write!(
            f,
            ":{}?flow={FLOW}&type={TRANSPORT}&security={SECURITY}&fp={FINGERPRINT}&sni={}&pbk={}&sid={}#{}",
            self.port, self.server_name, self.public_key, self.short_id, self.name
        )
    }
}
