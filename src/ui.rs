use crate::models::SummaryResponse;

pub fn render_index(summary: &SummaryResponse) -> String {
    let source = if summary.source.is_empty() {
        "no dataset loaded yet".to_string()
    } else {
        format!("dataset: {}", summary.source)
    };
    INDEX_HTML
        .replace("{{FLIGHTS}}", &summary.flights.to_string())
        .replace("{{SOURCE}}", &source)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Flightdeck</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef3f8;
      --bg-2: #cfe0ef;
      --ink: #1f2933;
      --accent: #1f6feb;
      --accent-2: #27425c;
      --accent-3: #d9822b;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(39, 66, 92, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e3ecf5 60%, #f2f6fa 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1060px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 26px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5b6672;
      font-size: 1rem;
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      align-items: end;
      gap: 14px;
    }

    .toolbar .field {
      display: grid;
      gap: 4px;
    }

    .toolbar label {
      font-size: 0.78rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #7b8794;
    }

    .toolbar input,
    .toolbar select {
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid rgba(39, 66, 92, 0.22);
      background: white;
      color: var(--ink);
      min-width: 130px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease;
      display: inline-flex;
      align-items: center;
      justify-content: center;
      gap: 8px;
    }

    button:active {
      transform: scale(0.98);
    }

    .btn-upload {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(31, 111, 235, 0.3);
    }

    .btn-reset {
      background: var(--accent-2);
      color: white;
      box-shadow: 0 10px 24px rgba(39, 66, 92, 0.3);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(39, 66, 92, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat span {
      display: block;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7b8794;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .value.net {
      color: var(--accent);
    }

    .chart-area {
      display: grid;
      gap: 16px;
    }

    .chart-header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    .chart-header h2 {
      margin: 0;
      font-size: 1.4rem;
    }

    .chart-header .subtitle {
      margin-top: 6px;
      font-size: 0.95rem;
    }

    .tabs {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      padding: 6px;
      background: rgba(39, 66, 92, 0.08);
      border-radius: 999px;
    }

    .tab {
      background: transparent;
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #64707c;
      box-shadow: none;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(39, 66, 92, 0.12);
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(39, 66, 92, 0.08);
    }

    #chart,
    #map {
      width: 100%;
      display: block;
    }

    #chart {
      height: auto;
    }

    svg text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-line.alt {
      stroke: var(--accent-3);
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-point.alt {
      stroke: var(--accent-3);
    }

    .chart-bar {
      fill: var(--accent);
      opacity: 0.85;
    }

    .chart-bar.clickable {
      cursor: pointer;
    }

    .chart-bar.clickable:hover {
      fill: var(--accent-3);
    }

    .chart-grid {
      stroke: rgba(39, 66, 92, 0.12);
    }

    .chart-label {
      fill: #707a85;
      font-size: 11px;
    }

    .chart-value {
      fill: var(--accent-2);
      font-size: 11px;
      font-weight: 600;
    }

    .map-route {
      stroke: var(--accent);
      stroke-opacity: 0.55;
      fill: none;
    }

    .map-airport {
      fill: var(--accent-3);
      stroke: white;
      stroke-width: 1;
    }

    .legend {
      display: flex;
      gap: 18px;
      font-size: 0.85rem;
      color: #64707c;
    }

    .legend .swatch {
      display: inline-block;
      width: 12px;
      height: 12px;
      border-radius: 3px;
      margin-right: 6px;
      background: var(--accent);
      vertical-align: -1px;
    }

    .legend .swatch.alt {
      background: var(--accent-3);
    }

    .chart-metrics {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
      gap: 16px;
    }

    .card {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(39, 66, 92, 0.08);
    }

    .card h3 {
      margin: 0 0 10px;
      font-size: 1rem;
    }

    .card ul {
      margin: 0;
      padding: 0;
      list-style: none;
      display: grid;
      gap: 6px;
      font-size: 0.92rem;
    }

    .card li {
      display: flex;
      justify-content: space-between;
      gap: 10px;
    }

    .card li .count {
      color: var(--accent-2);
      font-weight: 600;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.9rem;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid rgba(39, 66, 92, 0.1);
      white-space: nowrap;
    }

    th {
      font-size: 0.78rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #7b8794;
    }

    .table-wrap {
      overflow-x: auto;
    }

    .status {
      font-size: 0.95rem;
      color: #64707c;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #6f7781;
      font-size: 0.9rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 640px) {
      .app {
        padding: 28px 22px;
      }
      button {
        width: 100%;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Flightdeck</h1>
      <p class="subtitle">Flight-event analytics &mdash; {{FLIGHTS}} flights, {{SOURCE}}.</p>
    </header>

    <section class="toolbar">
      <div class="field">
        <label for="file">Flight CSV</label>
        <input id="file" type="file" accept=".csv,text/csv" />
      </div>
      <button class="btn-upload" id="upload-btn" type="button">Load CSV</button>
      <div class="field">
        <label for="from">From</label>
        <input id="from" type="date" />
      </div>
      <div class="field">
        <label for="to">To</label>
        <input id="to" type="date" />
      </div>
      <div class="field">
        <label for="dest">Destination</label>
        <select id="dest"><option value="">All</option></select>
      </div>
      <div class="field">
        <label for="origin">Origin</label>
        <select id="origin"><option value="">All</option></select>
      </div>
      <button class="btn-reset" id="reset-btn" type="button">Reset filters</button>
    </section>

    <div class="status" id="status"></div>

    <section class="panel">
      <div class="stat">
        <span class="label">Flights</span>
        <span id="sum-flights" class="value">0</span>
      </div>
      <div class="stat">
        <span class="label">Skipped rows</span>
        <span id="sum-skipped" class="value">0</span>
      </div>
      <div class="stat">
        <span class="label">Unique aircraft</span>
        <span id="sum-aircraft" class="value">0</span>
      </div>
      <div class="stat">
        <span class="label">Airports</span>
        <span id="sum-airports" class="value">0</span>
      </div>
      <div class="stat">
        <span class="label">Filtered flights</span>
        <span id="sum-filtered" class="value net">0</span>
      </div>
    </section>

    <section class="chart-area">
      <div class="chart-header">
        <div>
          <h2 id="chart-title">Top airports</h2>
          <p id="chart-subtitle" class="subtitle">Landings per destination.</p>
        </div>
        <div class="tabs" role="tablist">
          <button class="tab active" type="button" data-tab="airports" role="tab" aria-selected="true">Top airports</button>
          <button class="tab" type="button" data-tab="routes" role="tab" aria-selected="false">Top routes</button>
          <button class="tab" type="button" data-tab="dow" role="tab" aria-selected="false">Day of week</button>
          <button class="tab" type="button" data-tab="hours" role="tab" aria-selected="false">Hour of day</button>
          <button class="tab" type="button" data-tab="daily" role="tab" aria-selected="false">Daily activity</button>
        </div>
      </div>
      <div class="chart-card">
        <svg id="chart" viewBox="0 0 720 300" aria-label="Analytics chart" role="img"></svg>
        <div class="legend" id="chart-legend"></div>
      </div>
      <div class="chart-metrics">
        <div class="stat">
          <span class="label" id="metric-1-label">&nbsp;</span>
          <span class="value" id="metric-1-value">&ndash;</span>
        </div>
        <div class="stat">
          <span class="label" id="metric-2-label">&nbsp;</span>
          <span class="value" id="metric-2-value">&ndash;</span>
        </div>
        <div class="stat">
          <span class="label" id="metric-3-label">&nbsp;</span>
          <span class="value" id="metric-3-value">&ndash;</span>
        </div>
      </div>
    </section>

    <section class="chart-area">
      <div class="chart-header">
        <div>
          <h2>Flight paths</h2>
          <p class="subtitle" id="map-subtitle">Top routes with known airport coordinates.</p>
        </div>
      </div>
      <div class="chart-card">
        <svg id="map" viewBox="0 0 720 380" aria-label="Flight path map" role="img"></svg>
      </div>
    </section>

    <section class="cards">
      <div class="card">
        <h3 id="id-aircraft-title">Aircraft</h3>
        <ul id="id-aircraft"></ul>
      </div>
      <div class="card">
        <h3 id="id-callsigns-title">Callsigns</h3>
        <ul id="id-callsigns"></ul>
      </div>
      <div class="card">
        <h3 id="id-registrations-title">Registrations</h3>
        <ul id="id-registrations"></ul>
      </div>
    </section>

    <section class="chart-area">
      <div class="chart-header">
        <div>
          <h2>Latest flights</h2>
          <p class="subtitle">Most recent landings in the current selection.</p>
        </div>
      </div>
      <div class="chart-card table-wrap">
        <table>
          <thead>
            <tr>
              <th>Landed (UTC)</th>
              <th>Departed</th>
              <th>Aircraft</th>
              <th>Callsign</th>
              <th>From</th>
              <th>To</th>
              <th>Registration</th>
            </tr>
          </thead>
          <tbody id="flight-rows"></tbody>
        </table>
      </div>
    </section>

    <p class="hint">All buckets use UTC. Click a bar in "Top airports" to drill into where its traffic arrives from.</p>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');
    const mapEl = document.getElementById('map');
    const chartTitleEl = document.getElementById('chart-title');
    const chartSubtitleEl = document.getElementById('chart-subtitle');
    const legendEl = document.getElementById('chart-legend');
    const mapSubtitleEl = document.getElementById('map-subtitle');
    const tabs = Array.from(document.querySelectorAll('.tab'));
    const fromEl = document.getElementById('from');
    const toEl = document.getElementById('to');
    const destEl = document.getElementById('dest');
    const originEl = document.getElementById('origin');

    const DAY_NAMES = ['Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat', 'Sun'];

    let statsData = null;
    let geoData = null;
    let activeTab = 'airports';
    let drilldown = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const filterQuery = () => {
      const params = new URLSearchParams();
      if (fromEl.value) params.set('from', fromEl.value);
      if (toEl.value) params.set('to', toEl.value);
      if (destEl.value) params.set('dest', destEl.value);
      if (originEl.value) params.set('origin', originEl.value);
      return params.toString();
    };

    const fetchJson = async (url) => {
      const res = await fetch(url);
      if (!res.ok) {
        throw new Error(await res.text() || 'Request failed');
      }
      return res.json();
    };

    const setMetrics = (items) => {
      for (let i = 0; i < 3; i += 1) {
        const label = document.getElementById(`metric-${i + 1}-label`);
        const value = document.getElementById(`metric-${i + 1}-value`);
        if (items[i]) {
          label.textContent = items[i].label;
          value.textContent = items[i].value;
        } else {
          label.innerHTML = '&nbsp;';
          value.innerHTML = '&ndash;';
        }
      }
    };

    const emptyChart = (message) => {
      chartEl.setAttribute('viewBox', '0 0 720 120');
      chartEl.innerHTML = `<text class="chart-label" x="360" y="60" text-anchor="middle">${message}</text>`;
      legendEl.innerHTML = '';
    };

    // Horizontal bars for ranked lists (airports, routes, arrivals-from).
    const renderRows = (items, onClick) => {
      if (!items.length) {
        emptyChart('No data in the current selection');
        return;
      }

      const width = 720;
      const rowH = 26;
      const top = 10;
      const labelW = 110;
      const valueW = 60;
      const height = top * 2 + items.length * rowH;
      const max = Math.max(...items.map((item) => item.value));
      const scale = (width - labelW - valueW - 20) / (max || 1);

      let svg = '';
      items.forEach((item, index) => {
        const y = top + index * rowH;
        const barW = Math.max(2, item.value * scale);
        const clickable = onClick ? ' clickable' : '';
        svg += `<g data-index="${index}">`;
        svg += `<text class="chart-label" x="${labelW - 8}" y="${y + 17}" text-anchor="end">${item.label}</text>`;
        svg += `<rect class="chart-bar${clickable}" data-index="${index}" x="${labelW}" y="${y + 4}" width="${barW.toFixed(1)}" height="${rowH - 10}" rx="4" />`;
        svg += `<text class="chart-value" x="${labelW + barW + 8}" y="${y + 17}">${item.value}</text>`;
        svg += '</g>';
      });

      chartEl.setAttribute('viewBox', `0 0 ${width} ${height}`);
      chartEl.innerHTML = svg;
      legendEl.innerHTML = '';

      if (onClick) {
        chartEl.querySelectorAll('.chart-bar').forEach((bar) => {
          bar.addEventListener('click', () => onClick(items[Number(bar.dataset.index)]));
        });
      }
    };

    // Vertical bars for the fixed histograms (day of week, hour of day).
    const renderColumns = (values, labels) => {
      const width = 720;
      const height = 300;
      const paddingX = 44;
      const paddingY = 40;
      const top = 20;
      const max = Math.max(...values, 1);
      const slot = (width - paddingX * 2) / values.length;
      const barW = Math.min(slot * 0.7, 48);
      const scaleY = (height - top - paddingY) / max;

      let svg = '';
      const ticks = 4;
      for (let i = 0; i <= ticks; i += 1) {
        const value = (max * i) / ticks;
        const y = height - paddingY - value * scaleY;
        svg += `<line class="chart-grid" x1="${paddingX}" y1="${y}" x2="${width - paddingX}" y2="${y}" />`;
        svg += `<text class="chart-label" x="${paddingX - 10}" y="${y + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }

      const labelEvery = values.length > 12 ? 3 : 1;
      values.forEach((value, index) => {
        const x = paddingX + index * slot + (slot - barW) / 2;
        const barH = value * scaleY;
        const y = height - paddingY - barH;
        svg += `<rect class="chart-bar" x="${x.toFixed(1)}" y="${y.toFixed(1)}" width="${barW.toFixed(1)}" height="${barH.toFixed(1)}" rx="4" />`;
        if (index % labelEvery === 0) {
          svg += `<text class="chart-label" x="${(x + barW / 2).toFixed(1)}" y="${height - paddingY + 18}" text-anchor="middle">${labels[index]}</text>`;
        }
      });

      chartEl.setAttribute('viewBox', `0 0 ${width} ${height}`);
      chartEl.innerHTML = svg;
      legendEl.innerHTML = '';
    };

    // Two-series line chart for daily activity.
    const renderLineChart = (points) => {
      if (!points.length) {
        emptyChart('No data in the current selection');
        return;
      }

      const width = 720;
      const height = 300;
      const paddingX = 44;
      const paddingY = 40;
      const top = 20;
      const max = Math.max(...points.map((p) => Math.max(p.landings, p.aircraft)), 1);
      const xStep = points.length > 1 ? (width - paddingX * 2) / (points.length - 1) : 0;
      const scaleY = (height - top - paddingY) / max;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - value * scaleY;

      const path = (key) => points
        .map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i).toFixed(2)} ${y(p[key]).toFixed(2)}`)
        .join(' ');

      let svg = '';
      const ticks = 4;
      for (let i = 0; i <= ticks; i += 1) {
        const value = (max * i) / ticks;
        const yPos = y(value);
        svg += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        svg += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil(points.length / 10));
      points.forEach((p, i) => {
        if (i % labelEvery === 0) {
          svg += `<text class="chart-label" x="${x(i).toFixed(1)}" y="${height - paddingY + 18}" text-anchor="middle">${p.label}</text>`;
        }
      });

      svg += `<path class="chart-line" d="${path('landings')}" />`;
      svg += `<path class="chart-line alt" d="${path('aircraft')}" />`;
      if (points.length <= 40) {
        points.forEach((p, i) => {
          svg += `<circle class="chart-point" cx="${x(i).toFixed(1)}" cy="${y(p.landings).toFixed(1)}" r="3.5" />`;
          svg += `<circle class="chart-point alt" cx="${x(i).toFixed(1)}" cy="${y(p.aircraft).toFixed(1)}" r="3.5" />`;
        });
      }

      chartEl.setAttribute('viewBox', `0 0 ${width} ${height}`);
      chartEl.innerHTML = svg;
      legendEl.innerHTML = '<span><span class="swatch"></span>Landings</span>' +
        '<span><span class="swatch alt"></span>Unique aircraft</span>';
    };

    const renderAirports = () => {
      if (drilldown) {
        const entry = statsData.arrivals_from.find((a) => a.destination === drilldown);
        if (!entry) {
          drilldown = null;
        } else {
          chartTitleEl.textContent = `Arrivals into ${entry.destination}`;
          chartSubtitleEl.textContent = 'Flights by origin. Click any tab to leave the drill-down.';
          renderRows(entry.origins.map((o) => ({ label: o.value, value: o.count })));
          setMetrics([
            { label: 'Destination', value: entry.destination },
            { label: 'Landings', value: entry.count },
            { label: 'Distinct origins', value: entry.origins.length }
          ]);
          return;
        }
      }

      const items = statsData.top_airports.map((a) => ({ label: a.code, value: a.count, code: a.code }));
      chartTitleEl.textContent = 'Top airports';
      chartSubtitleEl.textContent = 'Landings per destination (top 20). Click a bar for arrivals-from.';
      renderRows(items, (item) => {
        drilldown = item.code;
        renderAirports();
      });
      const busiest = statsData.top_airports[0];
      setMetrics([
        { label: 'Destinations', value: statsData.arrivals_from.length },
        { label: 'Busiest', value: busiest ? busiest.code : String.fromCharCode(8211) },
        { label: 'Its landings', value: busiest ? busiest.count : 0 }
      ]);
    };

    const renderRoutes = () => {
      const items = statsData.top_routes.map((r) => ({
        label: `${r.origin} ${String.fromCharCode(8594)} ${r.destination}`,
        value: r.count
      }));
      chartTitleEl.textContent = 'Top routes';
      chartSubtitleEl.textContent = 'Flights per origin-destination pair (top 20).';
      renderRows(items);
      const busiest = statsData.top_routes[0];
      setMetrics([
        { label: 'Routes shown', value: statsData.top_routes.length },
        { label: 'Busiest route', value: busiest ? `${busiest.origin}-${busiest.destination}` : String.fromCharCode(8211) },
        { label: 'Its flights', value: busiest ? busiest.count : 0 }
      ]);
    };

    const renderDow = () => {
      chartTitleEl.textContent = 'Day of week';
      chartSubtitleEl.textContent = 'Landings per weekday (UTC, Monday first).';
      renderColumns(statsData.day_of_week, DAY_NAMES);
      const busiest = statsData.day_of_week.indexOf(Math.max(...statsData.day_of_week));
      setMetrics([
        { label: 'Flights', value: statsData.flights },
        { label: 'Busiest day', value: statsData.flights ? DAY_NAMES[busiest] : String.fromCharCode(8211) },
        { label: 'Its landings', value: statsData.flights ? statsData.day_of_week[busiest] : 0 }
      ]);
    };

    const renderHours = () => {
      chartTitleEl.textContent = 'Hour of day';
      chartSubtitleEl.textContent = 'Landings per hour (UTC).';
      renderColumns(statsData.hour_of_day, statsData.hour_of_day.map((_, i) => String(i).padStart(2, '0')));
      const busiest = statsData.hour_of_day.indexOf(Math.max(...statsData.hour_of_day));
      setMetrics([
        { label: 'Flights', value: statsData.flights },
        { label: 'Busiest hour', value: statsData.flights ? `${String(busiest).padStart(2, '0')}:00` : String.fromCharCode(8211) },
        { label: 'Its landings', value: statsData.flights ? statsData.hour_of_day[busiest] : 0 }
      ]);
    };

    const renderDaily = () => {
      const points = statsData.daily.map((d) => ({
        label: d.date.slice(5),
        landings: d.landings,
        aircraft: d.unique_aircraft
      }));
      chartTitleEl.textContent = 'Daily activity';
      chartSubtitleEl.textContent = 'Landings and unique aircraft per calendar day (UTC).';
      renderLineChart(points);
      const total = statsData.daily.reduce((acc, d) => acc + d.landings, 0);
      const peak = statsData.daily.reduce((acc, d) => Math.max(acc, d.landings), 0);
      setMetrics([
        { label: 'Days covered', value: statsData.daily.length },
        { label: 'Total landings', value: total },
        { label: 'Peak day', value: peak }
      ]);
    };

    const renderActiveTab = () => {
      if (!statsData) {
        return;
      }
      if (!statsData.flights) {
        chartTitleEl.textContent = 'No flights';
        chartSubtitleEl.textContent = 'Load a CSV or relax the filters.';
        emptyChart('No data in the current selection');
        setMetrics([]);
        return;
      }
      if (activeTab === 'routes') {
        renderRoutes();
      } else if (activeTab === 'dow') {
        renderDow();
      } else if (activeTab === 'hours') {
        renderHours();
      } else if (activeTab === 'daily') {
        renderDaily();
      } else {
        renderAirports();
      }
    };

    const setActiveTab = (tab) => {
      activeTab = tab;
      drilldown = null;
      tabs.forEach((button) => {
        const isActive = button.dataset.tab === tab;
        button.classList.toggle('active', isActive);
        button.setAttribute('aria-selected', String(isActive));
      });
      renderActiveTab();
    };

    const project = (lat, lon) => ({
      x: 20 + ((lon + 180) / 360) * 680,
      y: 20 + ((90 - lat) / 180) * 340
    });

    const renderMap = () => {
      if (!geoData || !geoData.routes.length) {
        mapEl.innerHTML = '<text class="chart-label" x="360" y="190" text-anchor="middle">No mappable routes in the current selection</text>';
        mapSubtitleEl.textContent = 'Top routes with known airport coordinates.';
        return;
      }

      let svg = '';
      for (let lon = -180; lon <= 180; lon += 30) {
        const { x } = project(0, lon);
        svg += `<line class="chart-grid" x1="${x.toFixed(1)}" y1="20" x2="${x.toFixed(1)}" y2="360" />`;
      }
      for (let lat = -60; lat <= 60; lat += 30) {
        const { y } = project(lat, 0);
        svg += `<line class="chart-grid" x1="20" y1="${y.toFixed(1)}" x2="700" y2="${y.toFixed(1)}" />`;
      }

      const max = Math.max(...geoData.routes.map((r) => r.count));
      const seen = new Map();
      geoData.routes.forEach((route) => {
        const a = project(route.origin.lat, route.origin.lon);
        const b = project(route.destination.lat, route.destination.lon);
        const w = 1 + 2.5 * (route.count / max);
        svg += `<line class="map-route" x1="${a.x.toFixed(1)}" y1="${a.y.toFixed(1)}" x2="${b.x.toFixed(1)}" y2="${b.y.toFixed(1)}" stroke-width="${w.toFixed(2)}" />`;
        seen.set(route.origin.code, a);
        seen.set(route.destination.code, b);
      });

      seen.forEach((point, code) => {
        svg += `<circle class="map-airport" cx="${point.x.toFixed(1)}" cy="${point.y.toFixed(1)}" r="3.5" />`;
        svg += `<text class="chart-label" x="${(point.x + 6).toFixed(1)}" y="${(point.y - 5).toFixed(1)}">${code}</text>`;
      });

      mapEl.innerHTML = svg;
      const missing = geoData.unresolved.length;
      mapSubtitleEl.textContent = missing
        ? `${geoData.routes.length} routes drawn; ${missing} without known coordinates.`
        : `${geoData.routes.length} routes drawn.`;
    };

    const renderIdentifierCard = (listId, titleId, name, stats) => {
      document.getElementById(titleId).textContent = `${name} (${stats.unique} unique)`;
      const list = document.getElementById(listId);
      if (!stats.top.length) {
        list.innerHTML = '<li><span class="chart-label">none recorded</span></li>';
        return;
      }
      list.innerHTML = stats.top
        .map((entry) => `<li><span>${entry.value}</span><span class="count">${entry.count}</span></li>`)
        .join('');
    };

    const renderIdentifiers = () => {
      renderIdentifierCard('id-aircraft', 'id-aircraft-title', 'Aircraft', statsData.aircraft);
      renderIdentifierCard('id-callsigns', 'id-callsigns-title', 'Callsigns', statsData.callsigns);
      renderIdentifierCard('id-registrations', 'id-registrations-title', 'Registrations', statsData.registrations);
    };

    const renderTable = (rows) => {
      const body = document.getElementById('flight-rows');
      if (!rows.length) {
        body.innerHTML = '<tr><td colspan="7">No flights in the current selection.</td></tr>';
        return;
      }
      body.innerHTML = rows
        .map((row) => `<tr>
          <td>${row.landed_at.replace('T', ' ').replace('Z', '')}</td>
          <td>${row.departed_at ? row.departed_at.replace('T', ' ').replace('Z', '') : ''}</td>
          <td>${row.aircraft_id}</td>
          <td>${row.callsign || ''}</td>
          <td>${row.origin}</td>
          <td>${row.destination}</td>
          <td>${row.registration || ''}</td>
        </tr>`)
        .join('');
    };

    const populateSelect = (select, codes) => {
      const current = select.value;
      select.innerHTML = '<option value="">All</option>' +
        codes.map((code) => `<option value="${code}">${code}</option>`).join('');
      if (codes.includes(current)) {
        select.value = current;
      }
    };

    // Filter options always come from the unfiltered dataset, so narrowing a
    // selection never hides the way back out of it.
    const loadFilterOptions = async () => {
      const stats = await fetchJson('/api/stats');
      const dests = stats.arrivals_from.map((a) => a.destination).sort();
      const origins = Array.from(
        new Set(stats.arrivals_from.flatMap((a) => a.origins.map((o) => o.value)))
      ).sort();
      populateSelect(destEl, dests);
      populateSelect(originEl, origins);
    };

    const loadSummary = async () => {
      const summary = await fetchJson('/api/summary');
      document.getElementById('sum-flights').textContent = summary.flights;
      document.getElementById('sum-skipped').textContent = summary.skipped;
      document.getElementById('sum-aircraft').textContent = summary.unique_aircraft;
      document.getElementById('sum-airports').textContent = summary.airports;
    };

    const loadStats = async () => {
      const qs = filterQuery();
      statsData = await fetchJson(qs ? `/api/stats?${qs}` : '/api/stats');
      document.getElementById('sum-filtered').textContent = statsData.flights;
      renderActiveTab();
      renderIdentifiers();
    };

    const loadGeo = async () => {
      const qs = filterQuery();
      geoData = await fetchJson(qs ? `/api/routes/geo?${qs}` : '/api/routes/geo');
      renderMap();
    };

    const loadTable = async () => {
      const qs = filterQuery();
      const url = qs ? `/api/flights?limit=50&${qs}` : '/api/flights?limit=50';
      renderTable(await fetchJson(url));
    };

    const refresh = async () => {
      await Promise.all([loadSummary(), loadStats(), loadGeo(), loadTable()]);
    };

    const upload = async () => {
      const input = document.getElementById('file');
      if (!input.files.length) {
        setStatus('Choose a CSV file first', 'error');
        return;
      }
      setStatus('Parsing...', 'info');
      const text = await input.files[0].text();
      const res = await fetch('/api/flights', {
        method: 'POST',
        headers: { 'content-type': 'text/csv' },
        body: text
      });
      if (!res.ok) {
        throw new Error(await res.text() || 'Upload failed');
      }
      const outcome = await res.json();
      drilldown = null;
      await Promise.all([refresh(), loadFilterOptions()]);
      setStatus(`Loaded ${outcome.rows} flights (${outcome.skipped} rows skipped)`, 'ok');
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => setActiveTab(button.dataset.tab));
    });

    document.getElementById('upload-btn').addEventListener('click', () => {
      upload().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('reset-btn').addEventListener('click', () => {
      fromEl.value = '';
      toEl.value = '';
      destEl.value = '';
      originEl.value = '';
      drilldown = null;
      refresh().catch((err) => setStatus(err.message, 'error'));
    });

    [fromEl, toEl, destEl, originEl].forEach((el) => {
      el.addEventListener('change', () => {
        drilldown = null;
        refresh().catch((err) => setStatus(err.message, 'error'));
      });
    });

    refresh()
      .then(loadFilterOptions)
      .catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"##;
