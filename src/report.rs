use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{info, instrument};

use crate::db::models::{PlayerId, PlayerStats};

pub type ReportResult<T> = core::result::Result<T, ReportErr>;

#[derive(Debug, Error)]
pub enum ReportErr {
    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize player table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render the dashboard for a player table. The table is the only input; the
/// template knows nothing about archives or messages.
pub fn render(table: &BTreeMap<PlayerId, PlayerStats>) -> ReportResult<String> {
    let blob = serde_json::to_string_pretty(table)?;
    Ok(TEMPLATE.replace(PLAYER_DATA_SLOT, &blob))
}

/// Render and write the dashboard to `out`, creating parent directories.
#[instrument(skip(table), fields(player_count = table.len()))]
pub fn write_report(out: &Path, table: &BTreeMap<PlayerId, PlayerStats>) -> ReportResult<()> {
    let html = render(table)?;

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    fs::write(out, html)?;
    info!(path = %out.display(), "dashboard written");
    Ok(())
}

const PLAYER_DATA_SLOT: &str = "__PLAYER_DATA__";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>TimeGuessr Dashboard</title>
<style>
  body { font-family: system-ui, sans-serif; background: #0f172a; color: #cbd5e1; margin: 0; }
  .wrap { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }
  h1 { color: #fff; text-align: center; }
  h2 { color: #e2e8f0; border-bottom: 1px solid #334155; padding-bottom: .5rem; }
  .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }
  .card { background: #1e293b; border: 1px solid #334155; border-radius: .75rem; padding: 1rem; }
  .card h3 { margin: 0 0 .75rem; color: #fff; }
  .grid { display: grid; grid-template-columns: 1fr 1fr; gap: .5rem; text-align: center; }
  .stat { background: #0f172a; border-radius: .5rem; padding: .5rem; }
  .stat b { display: block; font-size: 1.25rem; color: #4ade80; }
  .stat span { font-size: .7rem; text-transform: uppercase; color: #94a3b8; }
  table { width: 100%; border-collapse: collapse; }
  td, th { padding: .5rem .75rem; text-align: left; border-bottom: 1px solid #334155; }
  #today-section { display: none; }
</style>
</head>
<body>
<div class="wrap">
  <h1>TimeGuessr Dashboard</h1>
  <section id="today-section">
    <h2>Today's Leaderboard</h2>
    <table><thead><tr><th>Rank</th><th>Player</th><th>Score</th></tr></thead>
    <tbody id="today-body"></tbody></table>
  </section>
  <section>
    <h2>Overall Leaderboard</h2>
    <div id="leaderboard" class="cards"></div>
  </section>
</div>
<script>
const playerData = __PLAYER_DATA__;

function stat(value, label) {
  return `<div class="stat"><b>${value}</b><span>${label}</span></div>`;
}

function renderLeaderboard() {
  const board = document.getElementById('leaderboard');
  const ranked = Object.values(playerData)
    .sort((a, b) => b.average_score - a.average_score);

  board.innerHTML = ranked.map((p, i) => `
    <div class="card">
      <h3>#${i + 1} ${p.name}</h3>
      <div class="grid">
        ${stat(p.average_score.toLocaleString(), 'Avg Score')}
        ${stat(p.games_played, 'Games')}
        ${stat(p.high_score.toLocaleString(), 'High')}
        ${stat(p.low_score.toLocaleString(), 'Low')}
        ${stat(p.avg_location_score.toFixed(2), 'Avg Location')}
        ${stat(p.avg_date_score.toFixed(2), 'Avg Date')}
      </div>
    </div>`).join('');
}

function renderToday() {
  const today = new Date().toISOString().slice(0, 10);
  const scores = Object.values(playerData)
    .filter(p => today in p.scores_by_date)
    .map(p => ({ name: p.name, score: p.scores_by_date[today] }))
    .sort((a, b) => b.score - a.score);

  if (scores.length === 0) return;

  document.getElementById('today-body').innerHTML = scores.map((s, i) =>
    `<tr><td>${i + 1}</td><td>${s.name}</td><td>${s.score.toLocaleString()}</td></tr>`).join('');
  document.getElementById('today-section').style.display = 'block';
}

renderLeaderboard();
renderToday();
</script>
</body>
</html>
"#;
