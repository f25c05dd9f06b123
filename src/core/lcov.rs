//! Parser for the LCOV tracefile format.
//!
//! Only the record fields that carry coverage facts are interpreted; unknown
//! prefixes (`VER:`, `FNL:`, ...) are skipped so that newer tracefiles still
//! parse.

use std::str::FromStr;

use crate::types::{BranchDetail, CoverageReport, FunctionDetail, LcovError, LineDetail};

/// Parse an LCOV document into one report per `SF:` record, in input order.
pub fn parse(input: &str) -> Result<Vec<CoverageReport>, LcovError> {
    let mut reports = Vec::new();
    let mut current: Option<RecordBuilder> = None;

    for (idx, raw) in input.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line == "end_of_record" {
            if let Some(record) = current.take() {
                reports.extend(record.finish(lineno)?);
            }
            continue;
        }

        let Some((prefix, value)) = line.split_once(':') else {
            continue;
        };
        let record = current.get_or_insert_with(RecordBuilder::default);

        match prefix {
            "TN" => record.report.title = value.to_string(),
            "SF" => record.report.file = value.to_string(),
            "FN" => {
                let (line_no, name) = split_pair(value, lineno, "FN")?;
                record.report.functions.details.push(FunctionDetail {
                    name: name.to_string(),
                    line: parse_number(line_no, lineno, "FN line")?,
                    hit: 0,
                });
                record.unpaired.push(true);
            }
            "FNDA" => {
                let (hit, name) = split_pair(value, lineno, "FNDA")?;
                let hit = parse_number(hit, lineno, "FNDA hit count")?;
                record.set_function_hit(name, hit);
            }
            "FNF" => record.report.functions.found = parse_number(value, lineno, "FNF")?,
            "FNH" => record.report.functions.hit = parse_number(value, lineno, "FNH")?,
            "DA" => {
                let mut fields = value.split(',');
                let line_no = required(fields.next(), lineno, "DA line")?;
                let hit = required(fields.next(), lineno, "DA hit count")?;
                // a third field is an optional checksum
                record.report.lines.details.push(LineDetail {
                    line: parse_number(line_no, lineno, "DA line")?,
                    hit: parse_number(hit, lineno, "DA hit count")?,
                });
            }
            "LF" => record.report.lines.found = parse_number(value, lineno, "LF")?,
            "LH" => record.report.lines.hit = parse_number(value, lineno, "LH")?,
            "BRDA" => {
                let mut fields = value.split(',');
                let line_no = required(fields.next(), lineno, "BRDA line")?;
                let block = required(fields.next(), lineno, "BRDA block")?;
                let branch = required(fields.next(), lineno, "BRDA branch")?;
                let taken = required(fields.next(), lineno, "BRDA taken")?;
                record.report.branches.details.push(BranchDetail {
                    line: parse_number(line_no, lineno, "BRDA line")?,
                    block: parse_number(block, lineno, "BRDA block")?,
                    branch: parse_number(branch, lineno, "BRDA branch")?,
                    taken: match taken.trim() {
                        "-" => None,
                        taken => Some(parse_number(taken, lineno, "BRDA taken")?),
                    },
                });
            }
            "BRF" => record.report.branches.found = parse_number(value, lineno, "BRF")?,
            "BRH" => record.report.branches.hit = parse_number(value, lineno, "BRH")?,
            _ => {}
        }
    }

    if let Some(record) = current.take() {
        let last_line = input.lines().count();
        reports.extend(record.finish(last_line)?);
    }

    if reports.is_empty() {
        return Err(LcovError::Empty);
    }
    Ok(reports)
}

#[derive(Default)]
struct RecordBuilder {
    report: CoverageReport,
    /// Parallel to `report.functions.details`: no FNDA seen yet
    unpaired: Vec<bool>,
}

impl RecordBuilder {
    fn set_function_hit(&mut self, name: &str, hit: u64) {
        let details = &mut self.report.functions.details;
        if let Some(idx) = details
            .iter()
            .zip(&self.unpaired)
            .position(|(f, unpaired)| *unpaired && f.name == name)
        {
            details[idx].hit = hit;
            self.unpaired[idx] = false;
        }
    }

    fn has_details(&self) -> bool {
        let report = &self.report;
        !(report.functions.details.is_empty()
            && report.lines.details.is_empty()
            && report.branches.details.is_empty())
    }

    /// Header-only fragments (`TN:`, `VER:` with nothing after them) yield no
    /// report. Coverage data without `SF:` is an error.
    fn finish(self, lineno: usize) -> Result<Option<CoverageReport>, LcovError> {
        if self.report.file.is_empty() {
            if self.has_details() {
                return Err(LcovError::malformed(lineno, "record without SF"));
            }
            return Ok(None);
        }
        Ok(Some(self.report))
    }
}

fn split_pair<'a>(value: &'a str, lineno: usize, what: &str) -> Result<(&'a str, &'a str), LcovError> {
    value
        .split_once(',')
        .ok_or_else(|| LcovError::malformed(lineno, format!("{what} expects two fields")))
}

fn required<'a>(field: Option<&'a str>, lineno: usize, what: &str) -> Result<&'a str, LcovError> {
    field.ok_or_else(|| LcovError::malformed(lineno, format!("missing {what}")))
}

fn parse_number<T: FromStr>(value: &str, lineno: usize, what: &str) -> Result<T, LcovError> {
    value
        .trim()
        .parse()
        .map_err(|_| LcovError::malformed(lineno, format!("invalid {what}: '{value}'")))
}
