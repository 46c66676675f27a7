use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::Level;
use tracing_subscriber::{filter::FilterFn, fmt};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// Returns true if target == subsystem or target starts with "subsystem::"
fn matches_subsystem(target: &str, subsystem: &str) -> bool {
    target == subsystem
        || (target.starts_with(subsystem) && target[subsystem.len()..].starts_with("::"))
}

type SubsystemFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Catch-all filter: everything that does NOT belong to an explicit subsystem,
/// capped at `max_level`.
fn default_filter(subsystems: &[String], max_level: Level) -> SubsystemFilter {
    let subsystems = subsystems.to_vec();
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        let t = meta.target();
        for s in &subsystems {
            if matches_subsystem(t, s) {
                return false;
            }
        }
        meta.level() <= &max_level
    }))
}

// -------- rotating writer --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

#[derive(Clone)]
struct RotWriterHandle(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().unwrap().flush()
    }
}

/// A handle that may be absent; absent handles drop writes.
#[derive(Clone)]
struct MaybeWriter(Option<RotWriterHandle>);

impl Write for MaybeWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }
    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Route log records to per-subsystem files by target prefix, with an
/// optional default file for everything else.
struct FileRouter {
    default: Option<RotWriter>,
    by_subsystem: HashMap<String, RotWriter>,
}

impl FileRouter {
    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_subsystem.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = MaybeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeWriter(self.default.as_ref().map(|w| RotWriterHandle(w.0.clone())))
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        let target = meta.target();
        for (name, wr) in &self.by_subsystem {
            if matches_subsystem(target, name) {
                return MaybeWriter(Some(RotWriterHandle(wr.0.clone())));
            }
        }
        MaybeWriter(self.default.as_ref().map(|w| RotWriterHandle(w.0.clone())))
    }
}

/// Resolve a log file path against `base_dir` (home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_writer(section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }

    let log_path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = log_path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            eprintln!("Failed to create log dir '{}'", parent.to_string_lossy());
            return None;
        }
    }

    let max_bytes = section.max_size_mb.unwrap_or(100) as usize * 1024 * 1024;
    let rot = FileRotate::new(
        &log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(section.max_backups.unwrap_or(3))),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Some(RotWriter(Arc::new(Mutex::new(rot))))
}

/// Initialize logging from a configuration.
/// - `cfg`: logging sections keyed by subsystem, "default" is the catch-all
/// - `base_dir`: base directory for relative log file paths (usually server.home_dir)
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let default_section = cfg.get("default");
    let subsystem_sections: Vec<(String, &Section)> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != "default")
        .map(|(k, v)| (k.clone(), v))
        .collect();
    let subsystem_names: Vec<String> =
        subsystem_sections.iter().map(|(n, _)| n.clone()).collect();

    let router = FileRouter {
        default: default_section.and_then(|s| open_rotating_writer(s, base_dir)),
        by_subsystem: subsystem_sections
            .iter()
            .filter_map(|(name, s)| {
                open_rotating_writer(s, base_dir).map(|w| (name.clone(), w))
            })
            .collect(),
    };

    build_layers(
        default_section,
        &subsystem_sections,
        &subsystem_names,
        router,
    );
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

fn build_layers(
    default_section: Option<&Section>,
    subsystem_sections: &[(String, &Section)],
    subsystem_names: &[String],
    router: FileRouter,
) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{filter::Targets, layer::SubscriberExt, prelude::*, Registry};

    let ansi = atty::is(atty::Stream::Stdout);

    // Console: explicit per-subsystem levels
    let mut console_targets = Targets::new().with_default(LevelFilter::OFF);
    for (name, section) in subsystem_sections {
        if let Some(level) = parse_tracing_level(&section.console_level).map(LevelFilter::from_level)
        {
            console_targets = console_targets.with_target(name.clone(), level);
        }
    }

    // Files: explicit per-subsystem levels
    let mut file_targets = Targets::new().with_default(LevelFilter::OFF);
    for (name, section) in subsystem_sections {
        if section.file.trim().is_empty() {
            continue;
        }
        if let Some(level) = parse_tracing_level(&section.file_level).map(LevelFilter::from_level) {
            file_targets = file_targets.with_target(name.clone(), level);
        }
    }

    let console_layer = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets);

    if router.is_empty() && default_section.is_none() {
        let _ = Registry::default().with(console_layer).try_init();
        return;
    }

    let has_default_file = router.default.is_some();
    let router_for_explicit = FileRouter {
        default: router.default.clone(),
        by_subsystem: router.by_subsystem.clone(),
    };

    let explicit_file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(router_for_explicit)
        .with_filter(file_targets);

    if let Some(section) = default_section {
        if let Some(console_level) = parse_tracing_level(&section.console_level) {
            let console_default = fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_level(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(default_filter(subsystem_names, console_level));

            if has_default_file {
                if let Some(file_level) = parse_tracing_level(&section.file_level) {
                    let file_default = fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_target(true)
                        .with_level(true)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_writer(router)
                        .with_filter(default_filter(subsystem_names, file_level));

                    let _ = Registry::default()
                        .with(console_layer)
                        .with(explicit_file_layer)
                        .with(console_default)
                        .with(file_default)
                        .try_init();
                    return;
                }
            }

            let _ = Registry::default()
                .with(console_layer)
                .with(explicit_file_layer)
                .with(console_default)
                .try_init();
            return;
        }
    }

    let _ = Registry::default()
        .with(console_layer)
        .with(explicit_file_layer)
        .try_init();
}
