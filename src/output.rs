use anyhow::{Context, Result};
use chrono::Local;
use console::style;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;

use crate::aggregate::AggregateCounts;
use crate::types::{Classification, MatchResult};

/// Page with background reading for a variant; the identifier is appended
pub const DEFAULT_LOOKUP_URL: &str = "https://www.snpedia.com/index.php/";

/// Supported report formats
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
    Tsv,
}

/// Everything produced by one run
#[derive(Debug, Serialize)]
pub struct Report {
    pub source: String,
    pub generated_at: String,
    pub summary: AggregateCounts,
    pub matches: Vec<MatchResult>,
}

impl Report {
    pub fn new(
        source: impl Into<String>,
        summary: AggregateCounts,
        matches: Vec<MatchResult>,
    ) -> Self {
        Self {
            source: source.into(),
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            summary,
            matches,
        }
    }
}

/// Renders a [`Report`] in one of the [`ReportFormat`]s
pub struct ReportGenerator {
    color: bool,
    lookup_url: String,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(false, DEFAULT_LOOKUP_URL)
    }
}

impl ReportGenerator {
    pub fn new(color: bool, lookup_url: &str) -> Self {
        Self {
            color,
            lookup_url: lookup_url.to_string(),
        }
    }

    pub fn lookup_link(&self, variant_id: &str) -> String {
        format!("{}{}", self.lookup_url, variant_id)
    }

    pub fn generate<W: Write>(
        &self,
        report: &Report,
        format: ReportFormat,
        out: &mut W,
    ) -> Result<()> {
        match format {
            ReportFormat::Text => self.write_text(report, out)?,
            ReportFormat::Json => self.write_json(report, out)?,
            ReportFormat::Csv => self.write_delimited(report, b',', out)?,
            ReportFormat::Tsv => self.write_delimited(report, b'\t', out)?,
        }

        out.flush().context("Failed to flush report")?;
        Ok(())
    }

    fn write_text<W: Write>(&self, report: &Report, out: &mut W) -> Result<()> {
        let summary = &report.summary;

        writeln!(
            out,
            "{}",
            style(format!(
                "Processing {} SNPs sorted by Chromosome",
                summary.total_records
            ))
            .bold()
            .force_styling(self.color)
        )?;

        let chromosomes: Vec<&str> = summary.chromosomes().collect();
        writeln!(out, "Chromosomes: {}", chromosomes.join(" "))?;
        writeln!(out)?;

        writeln!(
            out,
            "Detected: {} chromosomes, {} positions, {} genotypes",
            summary.chromosome_count(),
            summary.position_count(),
            summary.genotype_count()
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "rsID count: {}, Internal ID count: {}",
            summary.reference_id_count, summary.internal_id_count
        )?;

        self.heading(out, "Number of occurrences per genotype")?;
        for (genotype, count) in summary.by_genotype.sorted_by_count() {
            writeln!(out, "Genotype: {:2} = {:6}", genotype, count)?;
        }

        self.heading(out, "Number of positions per chromosome pair")?;
        for (chromosome, count) in summary.by_chromosome.sorted_by_count() {
            writeln!(out, "Chromosome: {:2} = {:5}", chromosome, count)?;
        }

        self.heading(out, "Scanning curated variants for possible issues")?;
        if report.matches.is_empty() {
            writeln!(out, "No curated variants of interest found")?;
        }

        for result in &report.matches {
            let call = format!("{}:{}", result.observed_genotype, result.reference_genotype);
            let call = match result.classification {
                Classification::Exact => style(call).red(),
                Classification::Complementary => style(call).blue(),
                Classification::NoCallWarning => style(call).yellow(),
                Classification::NoRelationship => style(call),
            }
            .force_styling(self.color);

            writeln!(
                out,
                "{:>2} {:10} {}  {:10} {}",
                result.chromosome, result.variant_id, call, result.gene, result.note
            )?;
            writeln!(out, "   See: {}", self.lookup_link(&result.variant_id))?;
            writeln!(out)?;
        }

        Ok(())
    }

    fn heading<W: Write>(&self, out: &mut W, title: &str) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", style(title).bold().force_styling(self.color))?;
        writeln!(out)?;
        Ok(())
    }

    fn write_json<W: Write>(&self, report: &Report, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, report)
            .context("Failed to serialize report to JSON")?;
        writeln!(out)?;
        Ok(())
    }

    fn write_delimited<W: Write>(&self, report: &Report, delimiter: u8, out: &mut W) -> Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(out);

        wtr.write_record([
            "variant_id",
            "chromosome",
            "observed",
            "reference",
            "classification",
            "gene",
            "note",
            "link",
        ])?;

        for result in &report.matches {
            wtr.write_record([
                result.variant_id.as_str(),
                result.chromosome.as_str(),
                result.observed_genotype.as_str(),
                result.reference_genotype.as_str(),
                result.classification.label(),
                result.gene.as_str(),
                result.note.as_str(),
                self.lookup_link(&result.variant_id).as_str(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
