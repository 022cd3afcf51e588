use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LIBRARY_CRATE: &str = env!("CARGO_CRATE_NAME");

/// Filter used when `RUST_LOG` is unset: this library, the calling binary
/// and tower-http at `level`.
fn default_directives(crate_name: &str, level: &str) -> String {
    let mut directives = vec![format!("{LIBRARY_CRATE}={level}")];
    if crate_name != LIBRARY_CRATE {
        directives.push(format!("{crate_name}={level}"));
    }
    directives.push(format!("tower_http={level}"));
    directives.join(",")
}

pub fn init_standard_tracing(crate_name: &str, level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(crate_name, level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_crate_named_once() {
        assert_eq!(
            default_directives("school_records", "debug"),
            "school_records=debug,tower_http=debug"
        );
        assert_eq!(
            default_directives("setup_local_db", "info"),
            "school_records=info,setup_local_db=info,tower_http=info"
        );
    }
}
