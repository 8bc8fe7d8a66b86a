//! Human and JSON renderers.

use serde::Serialize;

/// Prints either aligned text tables or pretty JSON.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// One row per item; JSON mode prints the items verbatim.
    pub fn list<T: Serialize>(
        &self,
        items: &[T],
        headers: &[&str],
        row: impl Fn(&T) -> Vec<String>,
    ) -> anyhow::Result<()> {
        if self.json {
            return self.json_value(&items);
        }
        if items.is_empty() {
            println!("(none)");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = items.iter().map(row).collect();
        print!("{}", render_table(headers, &rows));
        Ok(())
    }

    /// A single record as `field: value` lines.
    pub fn record<T: Serialize>(&self, item: &T, fields: &[(&str, String)]) -> anyhow::Result<()> {
        if self.json {
            return self.json_value(item);
        }
        let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, value) in fields {
            println!("{name:<width$}  {value}");
        }
        Ok(())
    }

    /// A one-line confirmation; JSON mode prints `value` instead.
    pub fn done(&self, message: &str, value: serde_json::Value) -> anyhow::Result<()> {
        if self.json {
            return self.json_value(&value);
        }
        println!("{message}");
        Ok(())
    }

    fn json_value<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: Vec<&str>| {
        let line: Vec<String> =
            cells.iter().zip(&widths).map(|(cell, &width)| format!("{cell:<width$}")).collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };
    push_line(headers.to_vec());
    for row in rows {
        push_line(row.iter().map(String::as_str).collect());
    }
    out
}

pub fn or_dash(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_columns_are_aligned() {
        let table = render_table(
            &["NAME", "ID"],
            &[vec!["churn-model".into(), "m1".into()], vec!["fraud".into(), "m22".into()]],
        );
        assert_eq!(table, "NAME         ID\nchurn-model  m1\nfraud        m22\n");
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(or_dash(None::<String>), "-");
        assert_eq!(or_dash(Some(3)), "3");
    }
}
