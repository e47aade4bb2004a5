//! Domain building blocks shared by the Gemelli IT server and client.
//!
//! Nothing in this crate performs I/O. Enums, validation rules, role
//! normalization and the audit hash-chain math live here so the API,
//! repositories and the admin client agree on a single definition.

/// `Display` + `FromStr` for a serde string enum that exposes `as_str()`.
macro_rules! impl_text_enum {
    ($ty:ident) => {
        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::serde_json::from_value(::serde_json::Value::String(s.to_string()))
                    .map_err(|_| format!("valor inválido: {s}"))
            }
        }
    };
}

pub mod audit;
pub mod backup;
pub mod dashboard;
pub mod error;
pub mod hashing;
pub mod inventory;
pub mod roles;
pub mod scope;
pub mod ticket;
pub mod types;
pub mod validation;
