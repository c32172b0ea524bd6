use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KeyUse {
    Sig,
}

/// RSA public key in JWK form (RFC 7517).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    pub alg: String,
    #[serde(rename = "use")]
    pub use_field: KeyUse,
    pub n: String,
    pub e: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwk_serializes_use_field_as_use() {
        let jwk = Jwk {
            kty: "RSA".to_string(),
            kid: "k1".to_string(),
            alg: "RS256".to_string(),
            use_field: KeyUse::Sig,
            n: "modulus".to_string(),
            e: "AQAB".to_string(),
        };

        let value = serde_json::to_value(&jwk).expect("serialize");
        assert_eq!(value["use"], "sig");
        assert!(value.get("use_field").is_none());
    }
}
