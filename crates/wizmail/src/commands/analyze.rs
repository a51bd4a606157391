//! Heuristic analysis and the daily digest.

use serde::Serialize;
use wizmail_core::{AnalysisOptions, AnalysisResult, EmailId, Task};

use crate::cli::{AnalyzeArgs, SummaryArgs};
use crate::context::AppContext;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReport {
    id: EmailId,
    #[serde(flatten)]
    analysis: AnalysisResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    applied_labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    created_tasks: Vec<Task>,
}

fn render(report: &AnalyzeReport) -> String {
    let analysis = &report.analysis;
    let mut lines = vec![
        format!("Email:     {}", report.id),
        format!("Category:  {}", analysis.category),
        format!("Priority:  {}", analysis.priority.as_str()),
        format!("Sentiment: {}", analysis.sentiment.as_str()),
        format!("Important: {}", analysis.important),
        format!("Spam:      {}", analysis.spam),
    ];
    if !analysis.auto_labels.is_empty() {
        lines.push(format!("Labels:    {}", analysis.auto_labels.join(", ")));
    }
    if !analysis.keywords.is_empty() {
        lines.push(format!("Keywords:  {}", analysis.keywords.join(", ")));
    }
    if !analysis.summary.is_empty() {
        lines.push(format!("Summary:   {}", analysis.summary));
    }
    for item in &analysis.action_items {
        lines.push(format!("  - {item}"));
    }
    if !report.applied_labels.is_empty() {
        lines.push(format!("applied labels: {}", report.applied_labels.join(", ")));
    }
    for task in &report.created_tasks {
        lines.push(format!("created task #{}: {}", task.id, task.title));
    }
    lines.join("\n")
}

pub async fn analyze(ctx: &AppContext, args: AnalyzeArgs) -> anyhow::Result<()> {
    let options = args
        .level
        .map_or_else(|| ctx.analysis_options(), AnalysisOptions::with_level);
    let id = EmailId::new(args.id);

    let (analysis, applied_labels) = if args.apply {
        let (analysis, email) = ctx.mailbox.analyze_and_label(&id, &options).await?;
        (analysis, email.labels)
    } else {
        (ctx.mailbox.analyze(&id, &options).await?, Vec::new())
    };

    let created_tasks = if args.tasks {
        ctx.mailbox.tasks_from_analysis(&id, &options).await?
    } else {
        Vec::new()
    };

    let report = AnalyzeReport {
        id,
        analysis,
        applied_labels,
        created_tasks,
    };
    ctx.output.emit(&render(&report), &report)
}

pub async fn summary(ctx: &AppContext, args: SummaryArgs) -> anyhow::Result<()> {
    let summary = ctx.mailbox.daily_summary(args.hours).await?;

    let mut lines = vec![
        format!(
            "{} emails between {} and {}",
            summary.total_emails,
            summary.start.format("%Y-%m-%d %H:%M"),
            summary.end.format("%Y-%m-%d %H:%M")
        ),
        format!(
            "important: {}  unread: {}  sent: {}",
            summary.counts.important, summary.counts.unread, summary.counts.sent_by_me
        ),
    ];

    if !summary.top_senders.is_empty() {
        lines.push("Top senders:".to_string());
        for sender in &summary.top_senders {
            lines.push(format!("  {:>3}  {}", sender.count, sender.sender));
            for subject in &sender.subjects {
                lines.push(format!("         {subject}"));
            }
        }
    }

    if !summary.action_items.is_empty() {
        lines.push("Needs a reply:".to_string());
        for item in &summary.action_items {
            lines.push(format!("  {:<12} {}  {}", item.id, item.sender, item.subject));
        }
    }

    ctx.output.emit(&lines.join("\n"), &summary)
}
