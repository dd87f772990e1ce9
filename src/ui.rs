use crate::models::NutritionGoals;
use crate::progress::{ProgressData, ProgressStatus};
use crate::stats::DailyStats;

pub fn render_index(
    date: &str,
    stats: Option<&DailyStats>,
    goals: &NutritionGoals,
    water_glasses: u32,
) -> String {
    let (rows, meals) = match stats {
        Some(stats) => (
            [
                ("Calories", "kcal", &stats.progress.calories),
                ("Protein", "g", &stats.progress.protein),
                ("Carbs", "g", &stats.progress.carbs),
                ("Fat", "g", &stats.progress.fat),
                ("Fiber", "g", &stats.progress.fiber),
            ]
            .into_iter()
            .map(|(label, unit, progress)| progress_row(label, unit, progress))
            .collect::<String>(),
            stats
                .meals
                .iter()
                .map(|entry| {
                    format!(
                        "<li><span>{}</span>\
                         <span class=\"muted\">{} &middot; {:.0} kcal</span></li>",
                        escape(&entry.food.name),
                        entry.meal_type,
                        entry.nutrition.calories
                    )
                })
                .collect::<String>(),
        ),
        None => (
            format!(
                "<p class=\"empty\">Nothing logged yet today. Goal: {:.0} kcal.</p>",
                goals.calories
            ),
            String::new(),
        ),
    };

    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{ROWS}}", &rows)
        .replace("{{MEALS}}", &meals)
        .replace("{{WATER}}", &water_glasses.to_string())
}

fn progress_row(label: &str, unit: &str, progress: &ProgressData) -> String {
    let class = match progress.status {
        ProgressStatus::Under => "under",
        ProgressStatus::OnTrack => "on-track",
        ProgressStatus::Over => "over",
    };
    format!(
        "<div class=\"row {class}\"><span>{label}</span><span>{:.0} / {:.0} {unit}</span>\
         <div class=\"bar\"><div style=\"width:{}%\"></div></div></div>",
        progress.current,
        progress.goal,
        progress.percentage.min(100)
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Nutrition Tracker</title>
  <style>
    :root {
      --bg: #f4f7f1;
      --ink: #23302a;
      --muted: #6b7a72;
      --under: #e0a526;
      --on-track: #3e9b5f;
      --over: #d2553d;
      --card: rgba(255, 255, 255, 0.9);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      font-family: system-ui, sans-serif;
      background: linear-gradient(160deg, var(--bg), #e3efe4);
      color: var(--ink);
      display: flex;
      justify-content: center;
      padding: 32px 16px;
    }

    main {
      width: min(520px, 100%);
      background: var(--card);
      border-radius: 20px;
      padding: 28px;
      box-shadow: 0 20px 50px rgba(35, 48, 42, 0.12);
    }

    .row {
      display: grid;
      grid-template-columns: 1fr auto;
      gap: 6px;
      margin: 14px 0;
    }

    .bar {
      grid-column: 1 / -1;
      height: 8px;
      border-radius: 4px;
      background: #e6ebe7;
      overflow: hidden;
    }

    .bar div {
      height: 100%;
    }

    .under .bar div { background: var(--under); }
    .on-track .bar div { background: var(--on-track); }
    .over .bar div { background: var(--over); }

    ul {
      list-style: none;
      padding: 0;
    }

    li {
      display: flex;
      justify-content: space-between;
      padding: 8px 0;
      border-bottom: 1px solid #e6ebe7;
    }

    .muted, .empty {
      color: var(--muted);
    }

    .water {
      display: flex;
      align-items: center;
      gap: 12px;
    }

    button {
      border: none;
      border-radius: 10px;
      padding: 8px 14px;
      font-size: 1rem;
      cursor: pointer;
      background: var(--on-track);
      color: white;
    }
  </style>
</head>
<body>
  <main>
    <h1>Today</h1>
    <p class="muted">{{DATE}}</p>
    <section>{{ROWS}}</section>
    <ul>{{MEALS}}</ul>
    <section class="water">
      <span>Water: <strong>{{WATER}}</strong> glasses</span>
      <button data-action="sub">&minus;</button>
      <button data-action="add">+</button>
    </section>
  </main>
  <script>
    document.querySelectorAll("button[data-action]").forEach((button) => {
      button.addEventListener("click", async () => {
        await fetch("/api/water", {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify({ action: button.dataset.action }),
        });
        window.location.reload();
      });
    });
  </script>
</body>
</html>
"#;
