use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over the defaults;
/// each `-v` on the command line raises them one step.
pub fn init_logging(env: &Environment, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env, verbose)));

    // Command output goes to stdout, so logs stay on stderr
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 0)
        .with_thread_ids(false)
        .with_file(env.is_dev() && verbose > 1)
        .with_line_number(env.is_dev() && verbose > 1);

    if env.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.compact())
            .init();
    }

    tracing::debug!(verbose, "Logging initialized for {:?} environment", env);
}

fn default_directives(env: &Environment, verbose: u8) -> &'static str {
    match (env, verbose) {
        (_, 2..) => "taskdesk=trace,reqwest=debug,info",
        (_, 1) => "taskdesk=debug,reqwest=info,warn",
        (Environment::Dev | Environment::Staging, 0) => "taskdesk=info,warn",
        (Environment::Prod, 0) => "taskdesk=warn,error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_the_default_level() {
        assert_eq!(default_directives(&Environment::Prod, 0), "taskdesk=warn,error");
        assert_eq!(
            default_directives(&Environment::Prod, 1),
            "taskdesk=debug,reqwest=info,warn"
        );
        assert_eq!(
            default_directives(&Environment::Dev, 5),
            "taskdesk=trace,reqwest=debug,info"
        );
    }

    #[test]
    fn directives_parse() {
        for env in [Environment::Dev, Environment::Staging, Environment::Prod] {
            for verbose in 0..3 {
                assert!(EnvFilter::try_new(default_directives(&env, verbose)).is_ok());
            }
        }
    }
}
