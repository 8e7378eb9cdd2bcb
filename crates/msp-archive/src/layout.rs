//! Paths, modes and descriptor contents of the MSP and TLS layouts.

use msp_ca::KeyIdentifier;

/// Mode of certificates and descriptors.
pub const PUBLIC_MODE: u32 = 0o664;

/// Mode of private keys.
pub const PRIVATE_MODE: u32 = 0o600;

/// NodeOUs descriptor at the root of an MSP directory.
pub const CONFIG_PATH: &str = "config.yaml";

/// Transport CA certificate in a TLS bundle.
pub const TLS_CA_PATH: &str = "ca.crt";

/// Transport certificate in a TLS bundle.
pub const TLS_CERT_PATH: &str = "server.crt";

/// Transport private key in a TLS bundle.
pub const TLS_KEY_PATH: &str = "server.key";

pub fn ca_cert_path(domain: &str) -> String {
    format!("cacerts/ca.{domain}-cert.pem")
}

pub fn tls_ca_cert_path(domain: &str) -> String {
    format!("tlscacerts/tlsca.{domain}-cert.pem")
}

pub fn keystore_path(key_id: &KeyIdentifier) -> String {
    format!("keystore/{}_sk", key_id.to_hex())
}

pub fn signcert_path(user_id: &str, domain: &str) -> String {
    format!("signcerts/{user_id}.{domain}-cert.pem")
}

/// NodeOUs descriptor mapping every role OU to the signing CA certificate.
///
/// No trailing newline.
pub fn node_ous_config(ca_cert_path: &str) -> String {
    format!(
        "NodeOUs:
  Enable: true
  ClientOUIdentifier:
    Certificate: {ca_cert_path}
    OrganizationalUnitIdentifier: client
  PeerOUIdentifier:
    Certificate: {ca_cert_path}
    OrganizationalUnitIdentifier: peer
  AdminOUIdentifier:
    Certificate: {ca_cert_path}
    OrganizationalUnitIdentifier: admin
  OrdererOUIdentifier:
    Certificate: {ca_cert_path}
    OrganizationalUnitIdentifier: orderer"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(ca_cert_path("example.com"), "cacerts/ca.example.com-cert.pem");
        assert_eq!(
            tls_ca_cert_path("example.com"),
            "tlscacerts/tlsca.example.com-cert.pem"
        );
        assert_eq!(
            signcert_path("alice", "example.com"),
            "signcerts/alice.example.com-cert.pem"
        );
    }

    #[test]
    fn test_node_ous_config() {
        let config = node_ous_config("cacerts/ca.example.com-cert.pem");
        assert!(config.starts_with("NodeOUs:\n  Enable: true\n"));
        assert!(config.ends_with("OrganizationalUnitIdentifier: orderer"));
        assert_eq!(config.matches("Certificate: cacerts/ca.example.com-cert.pem").count(), 4);
        for role in ["client", "peer", "admin", "orderer"] {
            assert!(config.contains(&format!("OrganizationalUnitIdentifier: {role}\n"))
                || config.ends_with(&format!("OrganizationalUnitIdentifier: {role}")));
        }
    }
}
