//! Excel rendering

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::model::{Cell, Report};

fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Report".to_string()
    } else {
        cleaned
    }
}

pub fn render(report: &Report) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let title_format = Format::new().set_bold().set_font_size(16);
    let header_format = Format::new().set_bold().set_background_color("#D9E1F2");
    let money_format = Format::new().set_num_format("$#,##0.00");
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name(&report.title))?;

    sheet.write_string_with_format(0, 0, &report.title, &title_format)?;
    let mut row: u32 = 1;
    if let Some(subtitle) = &report.subtitle {
        sheet.write_string(row, 0, subtitle)?;
        row += 1;
    }
    sheet.write_string(
        row,
        0,
        format!(
            "Generated on: {}",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ),
    )?;
    row += 2;

    if report.is_empty() {
        sheet.write_string(row, 0, &report.empty_message)?;
        row += 2;
    } else {
        for (col, header) in report.columns.iter().enumerate() {
            sheet.write_string_with_format(row, col as u16, header, &header_format)?;
            sheet.set_column_width(col as u16, 18)?;
        }
        row += 1;

        for cells in &report.rows {
            for (col, cell) in cells.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(s) => {
                        sheet.write_string(row, col, s)?;
                    }
                    Cell::Integer(n) => {
                        sheet.write_number(row, col, *n as f64)?;
                    }
                    Cell::Money(v) => {
                        sheet.write_number_with_format(row, col, *v, &money_format)?;
                    }
                    Cell::Empty => {
                        sheet.write_string(row, col, "N/A")?;
                    }
                }
            }
            row += 1;
        }
        row += 1;
    }

    sheet.write_string_with_format(row, 0, "Summary", &bold)?;
    row += 1;
    for (label, value) in &report.summary {
        sheet.write_string(row, 0, format!("{}: {}", label, value))?;
        row += 1;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn renders_zip_container() {
        let report = Report {
            title: "Service History Report".into(),
            subtitle: None,
            generated_at: Utc::now(),
            columns: vec!["Date".into(), "Cost".into()],
            rows: vec![vec![Cell::text("2024-01-01"), Cell::Money(12.5)]],
            summary: vec![("Total Cost".into(), "$12.50".into())],
            empty_message: String::new(),
        };
        let bytes = render(&report).unwrap();
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn sheet_names_are_sanitised() {
        assert_eq!(sheet_name("a/b:c"), "abc");
        assert_eq!(sheet_name("x".repeat(40).as_str()).len(), 31);
        assert_eq!(sheet_name("???"), "Report");
    }
}
