use crate::models::{ClickOutcome, StatsResponse, TodayResponse};
use crate::ring::escape_xml;

#[derive(Debug, Clone)]
pub struct ClickDialog {
    pub outcome: ClickOutcome,
    pub title: String,
    pub message: String,
}

pub struct WidgetView {
    pub today: TodayResponse,
    pub stats: StatsResponse,
    pub ring_svg: String,
    pub accent: String,
    pub background: String,
    pub dark: bool,
    pub dialog: Option<ClickDialog>,
}

pub fn render_widget(view: &WidgetView) -> String {
    let stats = &view.stats.snapshot;
    WIDGET_HTML
        .replace("{{SCHEME}}", if view.dark { "dark" } else { "light" })
        .replace("{{ACCENT}}", &view.accent)
        .replace("{{BACKGROUND}}", &view.background)
        .replace("{{MESSAGE}}", &escape_xml(&view.today.message))
        .replace("{{RING}}", &view.ring_svg)
        .replace("{{DATE}}", &view.today.date)
        .replace("{{COUNT}}", &view.today.count.to_string())
        .replace("{{GOAL}}", &view.today.daily_goal.to_string())
        .replace("{{YESTERDAY}}", &stats.yesterday.to_string())
        .replace("{{WEEK}}", &stats.week.to_string())
        .replace("{{MONTH}}", &stats.month.to_string())
        .replace("{{YEAR}}", &stats.year.to_string())
        .replace("{{STREAK}}", &stats.current_streak.to_string())
        .replace("{{DIALOG}}", &view.dialog.as_ref().map(render_dialog).unwrap_or_default())
}

fn render_dialog(dialog: &ClickDialog) -> String {
    let actions = match dialog.outcome {
        ClickOutcome::Confirm => {
            r#"<form method="post" action="/click/smile"><button type="submit">Yes! 😄</button></form>
      <a class="secondary" href="/">Not yet</a>"#
        }
        ClickOutcome::GoalAchieved => r#"<a class="secondary" href="/">Awesome!</a>"#,
    };
    format!(
        r#"<section class="dialog">
      <h2>{}</h2>
      <p>{}</p>
      {actions}
    </section>"#,
        escape_xml(&dialog.title),
        escape_xml(&dialog.message)
    )
}

const WIDGET_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Smilo</title>
  <style>
    :root {
      color-scheme: {{SCHEME}};
      --accent: {{ACCENT}};
      --tint: {{BACKGROUND}};
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      display: grid;
      place-items: center;
      font-family: -apple-system, "Helvetica Neue", sans-serif;
      padding: 24px;
    }

    .widget {
      width: min(360px, 100%);
      border-radius: 28px;
      background: var(--tint);
      padding: 10px 0 16px;
      display: grid;
      justify-items: center;
      gap: 8px;
    }

    .message {
      margin: 0;
      color: var(--accent);
      font-weight: 600;
      font-size: 14px;
      text-align: center;
    }

    .ring svg {
      display: block;
      width: 220px;
      height: 220px;
    }

    .summary {
      font-size: 0.9rem;
      opacity: 0.75;
    }

    .history {
      width: min(360px, 100%);
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(100px, 1fr));
      gap: 10px;
      margin-top: 18px;
    }

    .stat {
      border-radius: 16px;
      padding: 12px;
      border: 1px solid var(--tint);
    }

    .stat .label {
      display: block;
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      opacity: 0.6;
    }

    .stat .value {
      font-size: 1.4rem;
      font-weight: 600;
    }

    .dialog {
      width: min(360px, 100%);
      margin-top: 18px;
      border-radius: 20px;
      padding: 18px;
      border: 2px solid var(--accent);
      text-align: center;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-size: 1rem;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .secondary {
      display: inline-block;
      margin-top: 10px;
      color: inherit;
    }
  </style>
</head>
<body>
  <main>
    <section class="widget">
      <p class="message">{{MESSAGE}}</p>
      <div class="ring">{{RING}}</div>
      <span class="summary">{{DATE}} · {{COUNT}}/{{GOAL}} smiles</span>
    </section>
    {{DIALOG}}
    <section class="history">
      <div class="stat"><span class="label">Yesterday</span><span class="value">{{YESTERDAY}}</span></div>
      <div class="stat"><span class="label">This week</span><span class="value">{{WEEK}}</span></div>
      <div class="stat"><span class="label">This month</span><span class="value">{{MONTH}}</span></div>
      <div class="stat"><span class="label">This year</span><span class="value">{{YEAR}}</span></div>
      <div class="stat"><span class="label">Streak</span><span class="value">{{STREAK}} days</span></div>
    </section>
  </main>
</body>
</html>
"#;
