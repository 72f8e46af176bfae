use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("COLUMNS").ok().as_deref(),
    ));
}

fn resolve(flags: &GlobalFlags, is_tty: bool, no_color: bool, columns: Option<&str>) -> UiPrefs {
    let table_color = is_tty && flags.format == OutputFormat::Table && !flags.quiet && !no_color;

    let term_width = columns
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        term_width,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        term_width: None,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::resolve;
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags(format: OutputFormat) -> GlobalFlags {
        GlobalFlags {
            format,
            limit: None,
            quiet: false,
            verbose: false,
            project_dir: None,
            actor: None,
        }
    }

    #[test]
    fn color_only_for_tables_on_a_terminal() {
        assert!(resolve(&flags(OutputFormat::Table), true, false, None).table_color);
        assert!(!resolve(&flags(OutputFormat::Json), true, false, None).table_color);
        assert!(!resolve(&flags(OutputFormat::Table), false, false, None).table_color);
        assert!(!resolve(&flags(OutputFormat::Table), true, true, None).table_color);
    }

    #[test]
    fn narrow_or_garbage_columns_are_ignored() {
        let table = flags(OutputFormat::Table);
        assert_eq!(resolve(&table, false, false, Some("120")).term_width, Some(120));
        assert_eq!(resolve(&table, false, false, Some("20")).term_width, None);
        assert_eq!(resolve(&table, false, false, Some("wide")).term_width, None);
    }
}
