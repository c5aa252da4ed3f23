use crate::xray::link::VlessLink;

/// Values produced while provisioning and consumed by later steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XrayContext {
    pub dest: String,
    pub server_name: String,
    pub listen_port: u16,
    pub shadowsocks_port: u16,
    pub private_key: String,
    pub public_key: String,
    pub client_id: String,
    pub short_id: String,
    pub shadowsocks_key: String,
    pub external_ip: String,
    pub vless_link: String,
}

impl XrayContext {
    /// Share link for the current values, labelled `name`.
    pub fn share_link(&self, name: &str) -> String {
        VlessLink {
            client_id: &self.client_id,
            address: &self.external_ip,
            port: self.listen_port,
            server_name: &self.server_name,
            public_key: &self.public_key,
            short_id: &self.short_id,
            name,
        }
        .to_string()
    }
}
