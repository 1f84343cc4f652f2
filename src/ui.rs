use crate::models::{LoadStatus, SessionView, WeekSummary};

pub fn render_index(view: &SessionView) -> String {
    let body = match &view.user {
        None => SIGNED_OUT_HTML.to_string(),
        Some(user) => render_tracker(view, &user.display_name),
    };
    fill(PAGE_HTML, &[("BODY", body.as_str())])
}

pub fn render_summary(rows: &[WeekSummary]) -> String {
    let mut table = String::new();
    for row in rows {
        table.push_str(&format!(
            "<tr><td>Week {}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row.week,
            row.start_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            row.workouts,
            row.done_days,
            or_dash(&row.weight),
            or_dash(&row.checkpoint),
        ));
    }
    let body = fill(SUMMARY_HTML, &[("ROWS", table.as_str())]);
    fill(PAGE_HTML, &[("BODY", body.as_str())])
}

fn render_tracker(view: &SessionView, name: &str) -> String {
    let index = view.current_week;
    let week = &view.tracker.weeks()[index];

    let options: String = (0..view.tracker.weeks().len())
        .map(|i| {
            let selected = if i == index { " selected" } else { "" };
            format!("<option value=\"{i}\"{selected}>Week {}</option>", i + 1)
        })
        .collect();

    let mut days = String::new();
    for (d, day) in week.days.iter().enumerate() {
        let done_class = if day.done { "done on" } else { "done" };
        let done_text = if day.done { "Done" } else { "Mark done" };
        days.push_str(&format!(
            r#"<div class="day">
  <h3>{label}</h3>
  <input placeholder="Workout" value="{workout}" oninput="editDay({d}, 'workout', this.value)" />
  <input placeholder="Cardio" value="{cardio}" oninput="editDay({d}, 'cardio', this.value)" />
  <input placeholder="Notes" value="{notes}" oninput="editDay({d}, 'notes', this.value)" />
  <button class="{done_class}" onclick="toggleDone({d}, {next})">{done_text}</button>
</div>
"#,
            label = escape(day.label().as_str()),
            workout = escape(&day.workout),
            cardio = escape(&day.cardio),
            notes = escape(&day.notes),
            next = !day.done,
        ));
    }

    let load_notice = match &view.load {
        Some(LoadStatus::Failed { message }) => format!(
            "<p class=\"status\" data-type=\"error\">Could not load saved progress: {}</p>",
            escape(message)
        ),
        _ => String::new(),
    };

    let start = week.start_date.map(|d| d.to_string()).unwrap_or_default();
    let dirty = if view.dirty { "Unsaved changes" } else { "All changes saved" };
    let name = escape(name);
    let week_index = index.to_string();
    let week_no = (index + 1).to_string();
    let checkpoint = escape(&week.checkpoint);
    let weight = escape(&week.weight);
    fill(
        TRACKER_HTML,
        &[
            ("NAME", name.as_str()),
            ("WEEK", week_index.as_str()),
            ("WEEK_NO", week_no.as_str()),
            ("OPTIONS", options.as_str()),
            ("START", start.as_str()),
            ("DAYS", days.as_str()),
            ("CHECKPOINT", checkpoint.as_str()),
            ("WEIGHT", weight.as_str()),
            ("DIRTY", dirty),
            ("LOAD", load_notice.as_str()),
        ],
    )
}

/// Substitutes `{{KEY}}` placeholders in one pass over `template`; inserted
/// values are never scanned again.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let key = &after[..close];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        escape(value)
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const SIGNED_OUT_HTML: &str = r#"<section class="center">
  <button class="primary" onclick="signIn()">Sign in</button>
  <p id="status" class="status"></p>
</section>"#;

const TRACKER_HTML: &str = r#"<header>
  <h1>Gym Tracker</h1>
  <div class="row">
    <span class="subtitle">{{NAME}}</span>
    <a href="/summary">Progress summary</a>
    <button class="danger" onclick="logout()">Logout</button>
  </div>
</header>
{{LOAD}}
<nav class="row">
  <button onclick="navigate({action: 'previous'})">Previous</button>
  <span>Week {{WEEK_NO}} of 12</span>
  <select onchange="navigate({action: 'select', week: Number(this.value)})">{{OPTIONS}}</select>
  <button onclick="navigate({action: 'next'})">Next</button>
</nav>
<section class="panel">
  <label>Start date <input type="date" value="{{START}}" onchange="setStartDate(this.value)" /></label>
  <div class="grid">
{{DAYS}}
  </div>
  <textarea placeholder="Weekly checkpoint summary" oninput="editWeek('checkpoint', this.value)">{{CHECKPOINT}}</textarea>
  <input placeholder="Weight (kg)" value="{{WEIGHT}}" oninput="editWeek('weight', this.value)" />
</section>
<section class="center">
  <button class="primary" onclick="saveNow()">Save progress</button>
  <p id="status" class="status">{{DIRTY}}</p>
</section>
<script>const WEEK = {{WEEK}};</script>"#;

const SUMMARY_HTML: &str = r#"<header>
  <h1>Workout Summary</h1>
</header>
<table>
  <thead><tr><th>Week</th><th>Start date</th><th>Workouts</th><th>Done days</th><th>Weight</th><th>Checkpoint</th></tr></thead>
  <tbody>
{{ROWS}}
  </tbody>
</table>
<p class="center"><a href="/">Back to tracker</a></p>"#;

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Gym Tracker</title>
  <style>
    :root {
      --bg: #f3f4f6;
      --ink: #1f2937;
      --accent: #2563eb;
      --ok: #16a34a;
      --danger: #dc2626;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, sans-serif;
    }

    main {
      width: min(960px, 100%);
      margin: 0 auto;
      padding: 24px 16px;
      display: grid;
      gap: 20px;
    }

    .row {
      display: flex;
      gap: 12px;
      align-items: center;
      justify-content: space-between;
    }

    .center {
      text-align: center;
    }

    .panel {
      background: var(--card);
      border-radius: 12px;
      padding: 20px;
      display: grid;
      gap: 12px;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
      gap: 12px;
    }

    .day {
      border: 1px solid #e5e7eb;
      border-radius: 10px;
      padding: 12px;
      display: grid;
      gap: 6px;
    }

    input, textarea, select {
      padding: 8px;
      border: 1px solid #d1d5db;
      border-radius: 6px;
      font: inherit;
    }

    button {
      padding: 8px 14px;
      border: 0;
      border-radius: 6px;
      background: #d1d5db;
      cursor: pointer;
      font: inherit;
    }

    button.primary {
      background: var(--accent);
      color: white;
    }

    button.danger {
      background: var(--danger);
      color: white;
    }

    button.done.on {
      background: var(--ok);
      color: white;
    }

    table {
      width: 100%;
      background: var(--card);
      border-collapse: collapse;
    }

    td, th {
      padding: 8px;
      text-align: left;
      border-top: 1px solid #e5e7eb;
    }

    .status[data-type="error"] {
      color: var(--danger);
    }
  </style>
</head>
<body>
  <main>
{{BODY}}
  </main>
  <script>
    async function post(path, body) {
      const res = await fetch(path, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body || {}),
      });
      if (!res.ok) {
        const status = document.getElementById('status');
        if (status) {
          status.textContent = await res.text();
          status.dataset.type = 'error';
        }
        throw new Error(res.statusText);
      }
      return res.json();
    }

    function showDirty(view) {
      const status = document.getElementById('status');
      if (status) {
        status.textContent = view.dirty ? 'Unsaved changes' : 'All changes saved';
        status.dataset.type = 'ok';
      }
    }

    async function signIn() {
      await post('/api/signin');
      location.reload();
    }

    async function logout() {
      const view = await (await fetch('/api/session')).json();
      let save = false;
      if (view.dirty) {
        save = window.confirm('You have unsaved changes. Do you want to save before logging out?');
      }
      await post('/api/logout', { save });
      location.reload();
    }

    async function navigate(body) {
      await post('/api/navigate', body);
      location.reload();
    }

    async function editDay(day, field, value) {
      showDirty(await post('/api/day', { week: WEEK, day, field, value }));
    }

    async function toggleDone(day, value) {
      await post('/api/day', { week: WEEK, day, field: 'done', value });
      location.reload();
    }

    async function editWeek(field, value) {
      showDirty(await post('/api/week', { week: WEEK, field, value }));
    }

    async function setStartDate(date) {
      showDirty(await post('/api/start-date', { week: WEEK, date }));
    }

    async function saveNow() {
      await post('/api/save');
      showDirty({ dirty: false });
    }
  </script>
</body>
</html>
"#;
