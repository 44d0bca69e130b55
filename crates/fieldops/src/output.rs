//! Terminal output for the CLI.
//!
//! Every handler funnels through [`OutputFormat::render_list`] or
//! [`OutputFormat::render_single`] so all surfaces honor `--output` the
//! same way: `table` builds a `tabled` view, `json`/`json-compact`/`yaml`
//! serialize the domain types directly, and `plain` prints bare
//! identifiers for shell pipelines.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::{ColorMode, OutputFormat};

impl OutputFormat {
    /// Render a collection of records.
    ///
    /// `row` maps a record to its table row; `id` yields the identifier
    /// printed in plain mode, one per line.
    pub fn render_list<T, R>(
        &self,
        items: &[T],
        row: impl Fn(&T) -> R,
        id: impl Fn(&T) -> String,
    ) -> String
    where
        T: Serialize,
        R: Tabled,
    {
        match self {
            Self::Table => Table::new(items.iter().map(row))
                .with(Style::rounded())
                .to_string(),
            Self::Plain => {
                let ids: Vec<String> = items.iter().map(id).collect();
                ids.join("\n")
            }
            Self::Json | Self::JsonCompact | Self::Yaml => self.serialize(items),
        }
    }

    /// Render one record.
    ///
    /// Detail views are hand-formatted, so table mode takes a preformatted
    /// string from `detail` rather than a `Tabled` row.
    pub fn render_single<T: Serialize>(
        &self,
        item: &T,
        detail: impl Fn(&T) -> String,
        id: impl Fn(&T) -> String,
    ) -> String {
        match self {
            Self::Table => detail(item),
            Self::Plain => id(item),
            Self::Json | Self::JsonCompact | Self::Yaml => self.serialize(item),
        }
    }

    fn serialize<T: Serialize + ?Sized>(&self, data: &T) -> String {
        match self {
            Self::Json => serde_json::to_string_pretty(data),
            Self::JsonCompact => serde_json::to_string(data),
            Self::Yaml => {
                return serde_yaml::to_string(data).expect("domain types serialize cleanly");
            }
            Self::Table | Self::Plain => unreachable!("dispatchers handle non-serde formats"),
        }
        .expect("domain types serialize cleanly")
    }
}

impl ColorMode {
    /// Whether escape codes should be written to stdout.
    ///
    /// `auto` requires a terminal and respects `NO_COLOR`.
    pub fn enabled(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
        }
    }
}

/// Write rendered output to stdout, unless `--quiet` suppressed it.
pub fn emit(rendered: &str, quiet: bool) {
    if quiet || rendered.is_empty() {
        return;
    }
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{rendered}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Record {
        code: String,
        count: u32,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Code")]
        code: String,
    }

    fn records() -> Vec<Record> {
        vec![
            Record {
                code: "ALG-001".into(),
                count: 2,
            },
            Record {
                code: "ORN-003".into(),
                count: 0,
            },
        ]
    }

    #[test]
    fn plain_lists_one_identifier_per_line() {
        let out = OutputFormat::Plain.render_list(
            &records(),
            |r| Row {
                code: r.code.clone(),
            },
            |r| r.code.clone(),
        );
        assert_eq!(out, "ALG-001\nORN-003");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = OutputFormat::JsonCompact.render_list(
            &records(),
            |r| Row {
                code: r.code.clone(),
            },
            |r| r.code.clone(),
        );
        assert!(!out.contains('\n'));
        assert!(out.starts_with("[{"));
    }

    #[test]
    fn single_table_mode_uses_the_detail_formatter() {
        let record = Record {
            code: "ALG-001".into(),
            count: 2,
        };
        let out =
            OutputFormat::Table.render_single(&record, |r| format!("Code: {}", r.code), |r| {
                r.code.clone()
            });
        assert_eq!(out, "Code: ALG-001");
    }
}
