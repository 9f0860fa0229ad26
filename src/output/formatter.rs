//! Output formatters for shortlist reports

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Result, ShortlisterError};
use crate::output::report::{ScoreTier, ShortlistReport};
use crate::processing::candidate::ValidatedCandidateRecord;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Strengths and weaknesses shown per candidate outside detailed mode
const HIGHLIGHTS_DISPLAY: usize = 3;
/// Matching skills shown in the summary table
const TABLE_SKILLS: usize = 3;
const TABLE_NAME_WIDTH: usize = 30;
const TABLE_SKILLS_WIDTH: usize = 40;

/// Trait for formatting shortlist reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ShortlistReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Which candidates and how much of each is shown
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub min_score_threshold: f64,
    pub max_matching_skills: usize,
    pub max_missing_skills: usize,
    pub detailed: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            min_score_threshold: 0.0,
            max_matching_skills: 10,
            max_missing_skills: 5,
            detailed: false,
        }
    }
}

impl DisplayOptions {
    pub fn from_config(output: &OutputConfig, min_score_threshold: f64, detailed: bool) -> Self {
        Self {
            min_score_threshold,
            max_matching_skills: output.max_matching_skills_display,
            max_missing_skills: output.max_missing_skills_display,
            detailed,
        }
    }

    fn highlights(&self) -> usize {
        if self.detailed {
            usize::MAX
        } else {
            HIGHLIGHTS_DISPLAY
        }
    }
}

/// Colored terminal output: rankings, summary table, score distribution
pub struct ConsoleFormatter {
    use_colors: bool,
    options: DisplayOptions,
}

/// Plain text results file
pub struct TextFormatter {
    options: DisplayOptions,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for documentation and reports
pub struct MarkdownFormatter {
    include_metadata: bool,
    options: DisplayOptions,
}

/// HTML formatter with professional styling
pub struct HtmlFormatter {
    include_styles: bool,
    options: DisplayOptions,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    text_formatter: TextFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

/// Askama template for HTML output
#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Shortlist: {{ job_title }}</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1000px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .header { text-align: center; margin-bottom: 30px; border-bottom: 3px solid #007acc; padding-bottom: 20px; }
        .score-badge { display: inline-block; padding: 4px 12px; border-radius: 16px; font-weight: bold; color: white; }
        .score-excellent { background: #28a745; }
        .score-good { background: #ffc107; color: #000; }
        .score-average { background: #17a2b8; }
        .score-poor { background: #dc3545; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th, td { text-align: left; padding: 8px; border-bottom: 1px solid #e9ecef; }
        th { color: #007acc; }
        .candidate { margin: 25px 0; padding: 15px; border-left: 4px solid #007acc; background: #f8f9fa; border-radius: 6px; }
        .matching { color: #28a745; }
        .missing { color: #dc3545; }
        .meta { color: #6c757d; font-size: 0.9em; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Resume Shortlist</h1>
            <p><strong>{{ job_title }}</strong> | {{ total }} candidates analyzed</p>
            <p class="meta">Generated {{ generated_at }} in {{ processing_time }}ms</p>
        </div>

        <h2>Summary</h2>
        <table>
            <tr><th>Rank</th><th>Candidate</th><th>Score</th><th>Top Skills Match</th></tr>
            {% for c in candidates %}
            <tr>
                <td>{{ c.rank }}</td>
                <td>{{ c.name }}</td>
                <td><span class="score-badge {{ c.score_class }}">{{ c.score }}</span></td>
                <td>{{ c.top_skills }}</td>
            </tr>
            {% endfor %}
        </table>

        {% if has_statistics %}
        <h2>Score Distribution</h2>
        <p>Average {{ average }} | Highest {{ highest }} | Lowest {{ lowest }}</p>
        <ul>
            <li>Excellent (80-100%): {{ excellent }}</li>
            <li>Good (60-79%): {{ good }}</li>
            <li>Average (40-59%): {{ average_count }}</li>
            <li>Poor (0-39%): {{ poor }}</li>
        </ul>
        {% endif %}

        <h2>Candidates</h2>
        {% for c in candidates %}
        <div class="candidate">
            <h3>#{{ c.rank }} {{ c.name }} <span class="score-badge {{ c.score_class }}">{{ c.score }}</span></h3>
            <p class="meta">{{ c.calibration }}</p>
            <p>{{ c.summary }}</p>
            {% if !c.matching_skills.is_empty() %}
            <p class="matching"><strong>Matching skills:</strong> {{ c.matching_skills.join(", ") }}</p>
            {% endif %}
            {% if !c.missing_skills.is_empty() %}
            <p class="missing"><strong>Missing skills:</strong> {{ c.missing_skills.join(", ") }}</p>
            {% endif %}
            {% if !c.strengths.is_empty() %}
            <p><strong>Strengths:</strong></p>
            <ul>{% for s in c.strengths %}<li>{{ s }}</li>{% endfor %}</ul>
            {% endif %}
            {% if !c.weaknesses.is_empty() %}
            <p><strong>Areas for improvement:</strong></p>
            <ul>{% for w in c.weaknesses %}<li>{{ w }}</li>{% endfor %}</ul>
            {% endif %}
        </div>
        {% endfor %}

        <p class="meta">Generated by Resume Shortlister v{{ version }} using {{ model }} | Job: {{ job_file }}</p>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    job_title: String,
    job_file: String,
    total: usize,
    generated_at: String,
    processing_time: u64,
    model: String,
    version: String,
    candidates: Vec<HtmlCandidate>,
    has_statistics: bool,
    average: String,
    highest: String,
    lowest: String,
    excellent: usize,
    good: usize,
    average_count: usize,
    poor: usize,
}

struct HtmlCandidate {
    rank: usize,
    name: String,
    score: String,
    score_class: &'static str,
    top_skills: String,
    calibration: String,
    summary: String,
    matching_skills: Vec<String>,
    missing_skills: Vec<String>,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, options: DisplayOptions) -> Self {
        Self { use_colors, options }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn banner(&self, title: &str, background: Color) -> String {
        if self.use_colors {
            format!("\n{}\n", format!(" {} ", title).on_color(background).bold())
        } else {
            format!("\n {} \n", title)
        }
    }

    fn score_color(score: f64) -> Color {
        match ScoreTier::for_score(score) {
            ScoreTier::Excellent => Color::Green,
            ScoreTier::Good => Color::Yellow,
            ScoreTier::Average => Color::Cyan,
            ScoreTier::Poor => Color::Red,
        }
    }

    fn format_score(&self, score: f64) -> String {
        let text = format!("{:.1}%", score);
        if self.use_colors {
            text.color(Self::score_color(score)).bold().to_string()
        } else {
            text
        }
    }

    fn format_list(&self, output: &mut String, title: &str, items: &[String], limit: usize, color: Color) {
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("\n{}\n", self.colorize(title, color)));
        for item in items.iter().take(limit) {
            output.push_str(&format!("  {}\n", self.colorize(&format!("• {}", item), color)));
        }
        if items.len() > limit {
            output.push_str(&format!(
                "  {}\n",
                self.colorize(&format!("... and {} more", items.len() - limit), color)
            ));
        }
    }

    fn format_candidate(&self, output: &mut String, rank: usize, candidate: &ValidatedCandidateRecord) {
        output.push_str(&format!("\n{}\n", self.banner(&format!("RANK #{}", rank), Color::White).trim()));
        output.push_str(&format!("{}\n", self.colorize(&"─".repeat(50), Color::Cyan)));
        let name = if self.use_colors {
            candidate.display_name().bold().to_string()
        } else {
            candidate.display_name().to_string()
        };
        output.push_str(&format!("Candidate: {}\n", name));
        output.push_str(&format!("Matching Score: {}\n", self.format_score(candidate.score)));

        if self.options.detailed {
            output.push_str(&format!(
                "{}\n",
                self.colorize(
                    &format!(
                        "Raw score {:.1}% | skill match {:.0}% | {} | name from {}",
                        candidate.raw_score,
                        candidate.match_ratio * 100.0,
                        candidate.adjustment,
                        candidate.name_source
                    ),
                    Color::BrightBlack
                )
            ));
            output.push_str(&format!(
                "{}\n",
                self.colorize(&format!("Source: {}", candidate.source_path), Color::BrightBlack)
            ));
        }

        if !candidate.summary.is_empty() {
            output.push_str(&format!("Summary: {}\n", candidate.summary));
        }

        self.format_list(
            output,
            "✓ Matching Skills:",
            &candidate.matching_skills,
            self.options.max_matching_skills,
            Color::Green,
        );
        self.format_list(
            output,
            "✗ Missing Skills:",
            &candidate.missing_skills,
            self.options.max_missing_skills,
            Color::Red,
        );
        self.format_list(
            output,
            "★ Key Strengths:",
            &candidate.strengths,
            self.options.highlights(),
            Color::Yellow,
        );
        self.format_list(
            output,
            "⚠ Areas for Improvement:",
            &candidate.weaknesses,
            self.options.highlights(),
            Color::Magenta,
        );

        output.push_str(&format!("{}\n", self.colorize(&"─".repeat(50), Color::Cyan)));
    }

    fn format_summary_table(&self, output: &mut String, visible: &[(usize, &ValidatedCandidateRecord)]) {
        output.push_str(&self.banner("CANDIDATE SUMMARY TABLE", Color::Green));
        output.push_str(&format!("{}\n", self.colorize(&"=".repeat(100), Color::Cyan)));
        let header = format!(
            "{:<6}{:<name_w$}{:<10}{:<skills_w$}",
            "Rank",
            "Candidate Name",
            "Score",
            "Top Skills Match",
            name_w = TABLE_NAME_WIDTH,
            skills_w = TABLE_SKILLS_WIDTH
        );
        output.push_str(&format!("{}\n", if self.use_colors { header.bold().to_string() } else { header }));
        output.push_str(&format!("{}\n", self.colorize(&"-".repeat(100), Color::Cyan)));

        for (rank, candidate) in visible {
            let name = truncate(candidate.display_name(), TABLE_NAME_WIDTH - 1, "");
            // Pad before coloring so escape codes do not break alignment
            let score = format!("{:<10}", format!("{:.1}%", candidate.score));
            let score = if self.use_colors {
                score.color(Self::score_color(candidate.score)).to_string()
            } else {
                score
            };
            output.push_str(&format!(
                "{:<6}{:<name_w$}{}{}\n",
                rank,
                name,
                score,
                self.colorize(&top_skills(candidate), Color::Cyan),
                name_w = TABLE_NAME_WIDTH
            ));
        }

        output.push_str(&format!("{}\n", self.colorize(&"-".repeat(100), Color::Cyan)));
    }

    fn format_distribution(&self, output: &mut String, report: &ShortlistReport) {
        let Some(stats) = &report.statistics else {
            return;
        };

        output.push_str(&self.banner("SCORE DISTRIBUTION", Color::Magenta));
        output.push_str(&format!("{}\n", self.colorize(&"=".repeat(60), Color::Cyan)));
        output.push_str(&format!(
            "Average Score: {}\n",
            self.colorize(&format!("{:.1}%", stats.average), Color::Yellow)
        ));
        output.push_str(&format!(
            "Highest Score: {}\n",
            self.colorize(&format!("{:.1}%", stats.highest), Color::Green)
        ));
        output.push_str(&format!(
            "Lowest Score:  {}\n",
            self.colorize(&format!("{:.1}%", stats.lowest), Color::Red)
        ));

        output.push_str("\nScore Ranges:\n");
        let rows = [
            (ScoreTier::Excellent, stats.distribution.excellent),
            (ScoreTier::Good, stats.distribution.good),
            (ScoreTier::Average, stats.distribution.average),
            (ScoreTier::Poor, stats.distribution.poor),
        ];
        for (tier, count) in rows {
            let line = format!("{} ({}): {} candidates", tier.label(), tier.range(), count);
            output.push_str(&format!("  {}\n", self.colorize(&line, Self::score_color(tier_floor(tier)))));
        }
        output.push_str(&format!("{}\n", self.colorize(&"=".repeat(60), Color::Cyan)));
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ShortlistReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.banner("RESUME SHORTLISTING RESULTS", Color::Blue));
        output.push_str(&format!("{}\n", self.colorize(&"=".repeat(80), Color::Cyan)));
        output.push_str(&format!("Job: {}\n", report.requirements.job_title));
        output.push_str(&format!("Total Candidates Analyzed: {}\n", report.candidates.len()));

        if self.options.detailed {
            output.push_str(&format!(
                "Required Skills ({}): {}\n",
                report.requirements.required_skills.len(),
                join_or_none(&report.requirements.required_skills)
            ));
            output.push_str(&format!(
                "Experience: {} ({})\n",
                report.requirements.experience_level, report.requirements.years_of_experience
            ));
        }
        output.push_str(&format!("{}\n", "=".repeat(80)));

        let visible = report.visible_candidates(self.options.min_score_threshold);
        if visible.is_empty() {
            output.push_str(&format!(
                "{}\n",
                self.colorize("No candidates meet the minimum score threshold.", Color::Red)
            ));
        }

        for (rank, candidate) in &visible {
            self.format_candidate(&mut output, *rank, candidate);
        }

        if !visible.is_empty() {
            self.format_summary_table(&mut output, &visible);
        }
        self.format_distribution(&mut output, report);

        output.push_str(&format!(
            "\n{} Generated by Resume Shortlister v{} | Model: {} | {}ms\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.shortlister_version,
            report.metadata.model,
            report.metadata.processing_time_ms
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl TextFormatter {
    pub fn new(options: DisplayOptions) -> Self {
        Self { options }
    }

    fn write_list(output: &mut String, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        output.push_str(title);
        output.push('\n');
        for item in items {
            output.push_str(&format!("  • {}\n", item));
        }
        output.push('\n');
    }
}

impl OutputFormatter for TextFormatter {
    fn format_report(&self, report: &ShortlistReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("RESUME SHORTLISTING RESULTS\n");
        output.push_str(&format!("{}\n", "=".repeat(80)));
        output.push_str(&format!("Total Candidates Analyzed: {}\n", report.candidates.len()));
        output.push_str(&format!("{}\n\n", "=".repeat(80)));

        for (rank, candidate) in report.visible_candidates(self.options.min_score_threshold) {
            output.push_str(&format!("RANK #{}\n", rank));
            output.push_str(&format!("{}\n", "─".repeat(50)));
            output.push_str(&format!("Candidate: {}\n", candidate.display_name()));
            output.push_str(&format!("Matching Score: {:.1}%\n", candidate.score));
            output.push_str(&format!("Summary: {}\n\n", candidate.summary));

            Self::write_list(&mut output, "✓ Matching Skills:", &candidate.matching_skills);
            Self::write_list(&mut output, "✗ Missing Skills:", &candidate.missing_skills);
            Self::write_list(&mut output, "★ Key Strengths:", &candidate.strengths);
            Self::write_list(&mut output, "⚠ Areas for Improvement:", &candidate.weaknesses);

            output.push_str(&format!("{}\n\n", "─".repeat(50)));
        }

        if let Some(stats) = &report.statistics {
            output.push_str("SUMMARY STATISTICS\n");
            output.push_str(&format!("{}\n", "=".repeat(30)));
            output.push_str(&format!("Average Score: {:.1}%\n", stats.average));
            output.push_str(&format!("Highest Score: {:.1}%\n", stats.highest));
            output.push_str(&format!("Lowest Score: {:.1}%\n", stats.lowest));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ShortlistReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, options: DisplayOptions) -> Self {
        Self {
            include_metadata,
            options,
        }
    }

    fn markdown_score_badge(score: f64) -> &'static str {
        match ScoreTier::for_score(score) {
            ScoreTier::Excellent => "🟢",
            ScoreTier::Good => "🟡",
            ScoreTier::Average => "🔵",
            ScoreTier::Poor => "🔴",
        }
    }

    fn format_markdown_candidate(&self, rank: usize, candidate: &ValidatedCandidateRecord) -> String {
        let mut output = format!(
            "### {}. {} {} {:.1}%\n\n",
            rank,
            escape_markdown(candidate.display_name()),
            Self::markdown_score_badge(candidate.score),
            candidate.score
        );

        if self.options.detailed {
            output.push_str(&format!(
                "*Raw score {:.1}%, skill match {:.0}%, {}, name from {}*\n\n",
                candidate.raw_score,
                candidate.match_ratio * 100.0,
                candidate.adjustment,
                candidate.name_source
            ));
        }
        if !candidate.summary.is_empty() {
            output.push_str(&format!("> {}\n\n", candidate.summary));
        }

        let sections = [
            ("✓ Matching skills", &candidate.matching_skills, self.options.max_matching_skills),
            ("✗ Missing skills", &candidate.missing_skills, self.options.max_missing_skills),
            ("★ Strengths", &candidate.strengths, self.options.highlights()),
            ("⚠ Areas for improvement", &candidate.weaknesses, self.options.highlights()),
        ];
        for (title, items, limit) in sections {
            if items.is_empty() {
                continue;
            }
            output.push_str(&format!("**{}:**\n\n", title));
            for item in items.iter().take(limit) {
                output.push_str(&format!("- {}\n", item));
            }
            if items.len() > limit {
                output.push_str(&format!("- *... and {} more*\n", items.len() - limit));
            }
            output.push('\n');
        }

        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ShortlistReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "# 📊 Resume Shortlist: {}\n\n",
            escape_markdown(&report.requirements.job_title)
        ));

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Model:** {}\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms,
                report.metadata.model
            ));
            output.push_str(&format!(
                "**Job:** `{}` | **Candidates:** {}\n\n",
                file_name(&report.metadata.job_file),
                report.candidates.len()
            ));
        }

        if !report.requirements.required_skills.is_empty() {
            output.push_str(&format!(
                "**Required skills:** {}\n\n",
                report.requirements.required_skills.join(", ")
            ));
        }

        let visible = report.visible_candidates(self.options.min_score_threshold);

        output.push_str("## Summary\n\n");
        output.push_str("| Rank | Candidate | Score | Top Skills Match |\n");
        output.push_str("|------|-----------|-------|------------------|\n");
        for (rank, candidate) in &visible {
            output.push_str(&format!(
                "| {} | {} | {:.1}% | {} |\n",
                rank,
                escape_markdown(candidate.display_name()).replace('|', "\\|"),
                candidate.score,
                top_skills(candidate).replace('|', "\\|")
            ));
        }
        output.push('\n');

        if let Some(stats) = &report.statistics {
            output.push_str("## Score Distribution\n\n");
            output.push_str(&format!(
                "**Average:** {:.1}% | **Highest:** {:.1}% | **Lowest:** {:.1}%\n\n",
                stats.average, stats.highest, stats.lowest
            ));
            output.push_str(&format!("- Excellent (80-100%): {}\n", stats.distribution.excellent));
            output.push_str(&format!("- Good (60-79%): {}\n", stats.distribution.good));
            output.push_str(&format!("- Average (40-59%): {}\n", stats.distribution.average));
            output.push_str(&format!("- Poor (0-39%): {}\n\n", stats.distribution.poor));
        }

        output.push_str("## Candidates\n\n");
        for (rank, candidate) in &visible {
            output.push_str(&self.format_markdown_candidate(*rank, candidate));
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by Resume Shortlister v{} using {}*\n",
                report.metadata.shortlister_version, report.metadata.model
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool, options: DisplayOptions) -> Self {
        Self {
            include_styles,
            options,
        }
    }

    fn create_template_data(&self, report: &ShortlistReport) -> HtmlTemplate {
        let limit = |items: &[String], max: usize| items.iter().take(max).cloned().collect::<Vec<_>>();

        let candidates = report
            .visible_candidates(self.options.min_score_threshold)
            .into_iter()
            .map(|(rank, candidate)| HtmlCandidate {
                rank,
                name: candidate.display_name().to_string(),
                score: format!("{:.1}%", candidate.score),
                score_class: match ScoreTier::for_score(candidate.score) {
                    ScoreTier::Excellent => "score-excellent",
                    ScoreTier::Good => "score-good",
                    ScoreTier::Average => "score-average",
                    ScoreTier::Poor => "score-poor",
                },
                top_skills: top_skills(candidate),
                calibration: format!(
                    "Raw score {:.1}%, skill match {:.0}%, {}",
                    candidate.raw_score,
                    candidate.match_ratio * 100.0,
                    candidate.adjustment
                ),
                summary: candidate.summary.clone(),
                matching_skills: limit(&candidate.matching_skills, self.options.max_matching_skills),
                missing_skills: limit(&candidate.missing_skills, self.options.max_missing_skills),
                strengths: limit(&candidate.strengths, self.options.highlights()),
                weaknesses: limit(&candidate.weaknesses, self.options.highlights()),
            })
            .collect();

        let stats = report.statistics.as_ref();
        HtmlTemplate {
            include_styles: self.include_styles,
            job_title: report.requirements.job_title.clone(),
            job_file: file_name(&report.metadata.job_file),
            total: report.candidates.len(),
            generated_at: report
                .metadata
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            processing_time: report.metadata.processing_time_ms,
            model: report.metadata.model.clone(),
            version: report.metadata.shortlister_version.clone(),
            candidates,
            has_statistics: stats.is_some(),
            average: stats.map(|s| format!("{:.1}%", s.average)).unwrap_or_default(),
            highest: stats.map(|s| format!("{:.1}%", s.highest)).unwrap_or_default(),
            lowest: stats.map(|s| format!("{:.1}%", s.lowest)).unwrap_or_default(),
            excellent: stats.map(|s| s.distribution.excellent).unwrap_or(0),
            good: stats.map(|s| s.distribution.good).unwrap_or(0),
            average_count: stats.map(|s| s.distribution.average).unwrap_or(0),
            poor: stats.map(|s| s.distribution.poor).unwrap_or(0),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &ShortlistReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ShortlisterError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool, options: DisplayOptions) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, options.clone()),
            text_formatter: TextFormatter::new(options.clone()),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true, options.clone()),
            html_formatter: HtmlFormatter::new(true, options),
        }
    }

    pub fn generate_report(&self, report: &ShortlistReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Text => self.text_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(true, DisplayOptions::default())
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, job_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(job_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console | OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };
    format!("{}_shortlist{}.{}", base_name, timestamp_suffix, extension)
}

/// First few validated skills, shortened to fit the summary table
fn top_skills(candidate: &ValidatedCandidateRecord) -> String {
    if candidate.matching_skills.is_empty() {
        return "None".to_string();
    }
    let joined = candidate
        .matching_skills
        .iter()
        .take(TABLE_SKILLS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    truncate(&joined, TABLE_SKILLS_WIDTH - 3, "...")
}

/// At most `max` characters, with `suffix` appended when cut
fn truncate(text: &str, max: usize, suffix: &str) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(suffix.chars().count());
    format!("{}{}", text.chars().take(keep).collect::<String>(), suffix)
}

fn tier_floor(tier: ScoreTier) -> f64 {
    match tier {
        ScoreTier::Excellent => 80.0,
        ScoreTier::Good => 60.0,
        ScoreTier::Average => 40.0,
        ScoreTier::Poor => 0.0,
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn escape_markdown(text: &str) -> String {
    text.replace('*', "\\*").replace('_', "\\_")
}
