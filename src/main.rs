use std::sync::Arc;

use cosmic::app::Settings;
use cosmic::iced::Limits;

mod application;
mod components;
mod message;
mod views;

use gestao::api::ApiClient;
use gestao::config::ConsoleConfig;
use gestao::localize;
use gestao::session::SessionProvider;
use gestao::session::store::SessionStore;

use application::{Flags, Gestao};

struct FilteredJournal {
    inner: systemd_journal_logger::JournalLog,
}

impl log::Log for FilteredJournal {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if metadata.target().starts_with("gestao") {
            let max = if gestao::debug_logging() {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            };
            metadata.level() <= max
        } else {
            metadata.level() <= log::LevelFilter::Warn
        }
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Journal logging (`journalctl --user -t gestao -f`); without a journal the
/// console runs silently.
fn init_logging(config: &ConsoleConfig) {
    gestao::set_debug_logging(config.debug_logging);
    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(j) => j.with_syslog_identifier("gestao".to_string()),
        Err(e) => {
            eprintln!("journal unavailable, logging disabled: {e}");
            return;
        }
    };
    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConsoleConfig::load();
    init_logging(&config);
    localize::localize();
    config.ensure_dirs()?;

    let api = ApiClient::new(&config.api_base_url, SessionProvider::new())?;
    let store = Arc::new(SessionStore::from_config(&config));

    let settings = Settings::default().size_limits(Limits::NONE.min_width(400.0).min_height(300.0));

    log::info!("Starting gestao against {}", config.api_base_url);
    cosmic::app::run::<Gestao>(settings, Flags { config, api, store })?;
    Ok(())
}
