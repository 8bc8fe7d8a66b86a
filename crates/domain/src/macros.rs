//! Display/FromStr generation for status-like enums
//!
//! Wire values for statuses and categories are lowercase snake strings; this
//! macro keeps `Display` and `FromStr` in lockstep with a single mapping.
//!
//! # Example
//!
//! ```rust
//! use arize_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum JobPhase {
//!     Export,
//!     Import,
//! }
//!
//! impl_domain_status_conversions!(JobPhase {
//!     Export => "export",
//!     Import => "import",
//! });
//!
//! assert_eq!(JobPhase::Import.to_string(), "import");
//! assert_eq!("EXPORT".parse::<JobPhase>(), Ok(JobPhase::Export));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// Parsing is case-insensitive and also accepts `-` in place of `_`, so
/// `data-quality`, `DATA_QUALITY` and `data_quality` all resolve to the same
/// variant. The error names the enum.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().replace('-', "_").as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestCategory {
        Performance,
        DataQuality,
    }

    impl_domain_status_conversions!(TestCategory {
        Performance => "performance",
        DataQuality => "data_quality",
    });

    #[test]
    fn display_uses_mapping() {
        assert_eq!(TestCategory::DataQuality.to_string(), "data_quality");
    }

    #[test]
    fn parses_case_and_dash_insensitively() {
        assert_eq!(TestCategory::from_str("PERFORMANCE"), Ok(TestCategory::Performance));
        assert_eq!(TestCategory::from_str("data-quality"), Ok(TestCategory::DataQuality));
    }

    mod with_result_alias {
        use std::str::FromStr;

        #[allow(dead_code)]
        type Result<T> = std::result::Result<T, crate::errors::ArizeError>;

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Phase {
            Export,
            Import,
        }

        impl_domain_status_conversions!(Phase {
            Export => "export",
            Import => "import",
        });

        #[test]
        fn expands_next_to_a_crate_result_alias() {
            assert_eq!(Phase::from_str("IMPORT"), Ok(Phase::Import));
            assert_eq!(Phase::Export.to_string(), "export");
        }
    }

    #[test]
    fn rejects_unknown_values_with_enum_name() {
        let err = TestCategory::from_str("drift").unwrap_err();
        assert!(err.contains("TestCategory"));
        assert!(err.contains("drift"));
    }
}
