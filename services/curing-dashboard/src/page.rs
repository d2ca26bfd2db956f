//! Server-rendered HTML page for the dashboard view

use std::fmt::Write;
use std::time::Instant;

use crate::charts::Chart;
use crate::state::{DashboardView, Tab};
use crate::view::{
    ActuatorCardView, BatteryView, NotificationItemView, NotificationListView, SensorCardView,
    EMPTY_NOTIFICATIONS,
};

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 200.0;

/// Time ranges offered on the history tab, in hours
pub const HISTORY_RANGES: [u32; 4] = [6, 12, 24, 48];

/// Escape text for use in HTML bodies and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the whole page. The toast is included only while visible at `now`.
pub fn render_page(view: &DashboardView, refresh_secs: u64, now: Instant) -> String {
    let tab_body = match view.tab {
        Tab::Dashboard => render_devices(view),
        Tab::History => render_history(view),
        Tab::Notifications => render_inbox(&view.inbox),
    };

    let toast = view
        .toast
        .visible(now)
        .map(|t| {
            format!(
                r#"<div class="toast {severity}">
        <i class="{icon}"></i> <span>{message}</span>
        <form method="post" action="/actions/toast/dismiss" class="inline"><button type="submit">&times;</button></form>
    </div>"#,
                severity = t.severity,
                icon = t.icon,
                message = escape_html(&t.message),
            )
        })
        .unwrap_or_default();

    let sim_time = view
        .sim_time
        .as_deref()
        .map(|t| format!(r#"<span class="sim-time">Simulacija: {}</span>"#, escape_html(t)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta http-equiv="refresh" content="{refresh_secs}">
    <title>Njega betona</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; }}
        header {{ display: flex; justify-content: space-between; align-items: center; }}
        .status-online {{ color: #27ae60; }}
        .status-offline {{ color: #e74c3c; }}
        .tabs form {{ display: inline; }}
        .tabs button.active {{ font-weight: 700; }}
        .badge {{ background: #e74c3c; color: #fff; border-radius: 1em; padding: 0 0.5em; }}
        .cards {{ display: grid; grid-template-columns: repeat(2, 1fr); gap: 1rem; }}
        .card {{ border: 1px solid #dee2e6; border-radius: 0.5rem; padding: 1rem; }}
        .status-indicator {{ display: inline-block; width: 0.7em; height: 0.7em; border-radius: 50%; }}
        .status-indicator.online {{ background: #27ae60; }}
        .status-indicator.offline {{ background: #e74c3c; }}
        .status-text.active {{ color: #27ae60; }}
        .status-text.inactive {{ color: #7f8c8d; }}
        .status-text.offline {{ color: #e74c3c; }}
        .battery-bar {{ background: #ecf0f1; height: 0.4em; }}
        .battery-fill {{ height: 100%; }}
        .battery-fill.critical, .battery .critical {{ background: #e74c3c; }}
        .battery-fill.warning {{ background: #f39c12; }}
        .battery-fill.good {{ background: #27ae60; }}
        .battery-fill.excellent {{ background: #2ecc71; }}
        .notification {{ border-left: 4px solid #7f8c8d; padding: 0.5rem; margin: 0.5rem 0; }}
        .notification.critical {{ border-color: #e74c3c; }}
        .notification.warning {{ border-color: #f39c12; }}
        .notification.info {{ border-color: #3498db; }}
        .notification.acknowledged {{ opacity: 0.6; }}
        .toast {{ position: fixed; top: 1rem; right: 1rem; padding: 0.75rem 1rem; border-radius: 0.5rem; background: #fff; box-shadow: 0 2px 8px rgba(0,0,0,0.2); }}
        .toast.critical {{ border-left: 4px solid #e74c3c; }}
        .toast.warning {{ border-left: 4px solid #f39c12; }}
        .toast.info {{ border-left: 4px solid #3498db; }}
        form.inline {{ display: inline; }}
    </style>
</head>
<body>
    <header>
        <h1>Njega betona</h1>
        <div>
            <span class="{connection_class}">{connection_label}</span>
            <span class="clock">{clock}</span>
            {sim_time}
        </div>
    </header>
    <nav class="tabs">
        {tabs}
    </nav>
    <main>
        {tab_body}
    </main>
    {toast}
</body>
</html>"#,
        refresh_secs = refresh_secs,
        connection_class = view.connection.css_class(),
        connection_label = view.connection.label(),
        clock = escape_html(&view.clock),
        sim_time = sim_time,
        tabs = render_tabs(view),
        tab_body = tab_body,
        toast = toast,
    )
}

fn render_tabs(view: &DashboardView) -> String {
    [
        (Tab::Dashboard, "Kontrolna tabla"),
        (Tab::History, "Istorija"),
        (Tab::Notifications, "Notifikacije"),
    ]
    .iter()
    .map(|(tab, title)| {
        let badge = if *tab == Tab::Notifications && view.badge.visible {
            format!(r#" <span class="badge">{}</span>"#, view.badge.count)
        } else {
            String::new()
        };
        let class = if *tab == view.tab { "active" } else { "" };
        format!(
            r#"<form method="post" action="/tabs/{tab}"><button type="submit" class="{class}">{title}{badge}</button></form>"#
        )
    })
    .collect::<Vec<_>>()
    .join("\n        ")
}

fn render_battery(battery: &BatteryView) -> String {
    format!(
        r#"<div class="battery"><i class="{icon}"></i> <span class="{level}">{text}</span>
                <div class="battery-bar"><div class="battery-fill {level}" style="width: {percent}%;"></div></div></div>"#,
        icon = battery.icon,
        level = battery.level.css_class(),
        text = battery.text,
        percent = battery.percent,
    )
}

fn render_sensor_card(title: &str, card: &SensorCardView) -> String {
    format!(
        r#"<div class="card">
            <h3><span class="{indicator}"></span> {title}</h3>
            <p>Temperatura: <strong>{temperature}</strong></p>
            <p>Vlažnost: <strong>{humidity}</strong></p>
            {battery}
        </div>"#,
        indicator = card.indicator.css_class(),
        title = title,
        temperature = card.temperature,
        humidity = card.humidity,
        battery = render_battery(&card.battery),
    )
}

fn render_actuator_card(title: &str, card: &ActuatorCardView, controls: &str) -> String {
    format!(
        r#"<div class="card">
            <h3><span class="{indicator}"></span> {title}</h3>
            <p>Status: <span class="{activity}">{label}</span></p>
            <p>{detail}</p>
            {battery}
            {controls}
        </div>"#,
        indicator = card.indicator.css_class(),
        title = title,
        activity = card.activity.css_class(),
        label = card.label,
        detail = escape_html(&card.detail),
        battery = render_battery(&card.battery),
        controls = controls,
    )
}

fn render_devices(view: &DashboardView) -> String {
    let pump_controls = r#"<form method="post" action="/actions/pump">
                <input type="number" name="duration" min="1" placeholder="300">
                <button type="submit" name="action" value="start">Pokreni</button>
                <button type="submit" name="action" value="stop">Zaustavi</button>
            </form>"#;
    let heater_controls = r#"<form method="post" action="/actions/heater">
                <input type="number" name="target_temperature" step="0.5" placeholder="50">
                <button type="submit" name="action" value="start">Pokreni</button>
                <button type="submit" name="action" value="stop">Zaustavi</button>
            </form>"#;

    let devices = &view.devices;
    format!(
        r#"<section class="cards">
        {beton}
        {povrsina}
        {pump}
        {heater}
    </section>"#,
        beton = render_sensor_card("Senzor betona", &devices.beton),
        povrsina = render_sensor_card("Senzor površine", &devices.povrsina),
        pump = render_actuator_card("Pumpa", &devices.pump, pump_controls),
        heater = render_actuator_card("Grijač", &devices.heater, heater_controls),
    )
}

/// Inline SVG line chart with a legend
pub fn render_chart(chart: &Chart) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<figure class="chart"><figcaption>{}</figcaption>"#,
        escape_html(&chart.title)
    );

    if chart.is_empty() {
        svg.push_str(r#"<p class="no-data">Nema podataka</p></figure>"#);
        return svg;
    }

    let _ = write!(
        svg,
        r#"<svg viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img" aria-label="{label}">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        label = escape_html(&chart.axis_label),
    );
    for (color, points) in chart.polylines(CHART_WIDTH, CHART_HEIGHT) {
        let _ = write!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            color, points
        );
    }
    svg.push_str("</svg>");

    if let Some((min, max)) = chart.bounds() {
        let _ = write!(svg, r#"<p class="axis">{:.1} – {:.1}</p>"#, min, max);
    }
    svg.push_str(r#"<ul class="legend">"#);
    for series in &chart.series {
        let _ = write!(
            svg,
            r#"<li style="color: {};">{}</li>"#,
            series.color,
            escape_html(&series.label)
        );
    }
    svg.push_str("</ul></figure>");
    svg
}

fn render_history(view: &DashboardView) -> String {
    let options: String = HISTORY_RANGES
        .iter()
        .map(|h| {
            let selected = if *h == view.history_hours {
                " selected"
            } else {
                ""
            };
            format!(r#"<option value="{h}"{selected}>{h}h</option>"#)
        })
        .collect();

    format!(
        r#"<section class="history">
        <form method="post" action="/actions/history">
            <select name="hours">{options}</select>
            <button type="submit">Prikaži</button>
        </form>
        {temperature}
        {humidity}
    </section>"#,
        options = options,
        temperature = render_chart(&view.charts.temperature),
        humidity = render_chart(&view.charts.humidity),
    )
}

fn render_notification(item: &NotificationItemView) -> String {
    let acknowledged = if item.acknowledged { " acknowledged" } else { "" };
    let ack_button = if item.acknowledged {
        String::new()
    } else {
        format!(
            r#"<form method="post" action="/actions/notifications/{id}/acknowledge" class="inline"><button type="submit">Potvrdi</button></form>
            <form method="post" action="/actions/notifications/{id}/read" class="inline"><button type="submit">Pročitano</button></form>"#,
            id = item.id
        )
    };

    format!(
        r#"<div class="notification {severity}{acknowledged}">
            <strong>{kind}</strong> <small>{time}</small>
            <p>{message}</p>
            {ack_button}
            <form method="post" action="/actions/notifications/{id}/delete" class="inline"><button type="submit">Obriši</button></form>
        </div>"#,
        severity = item.severity,
        acknowledged = acknowledged,
        kind = escape_html(&item.kind),
        time = escape_html(&item.time),
        message = escape_html(&item.message),
        ack_button = ack_button,
        id = item.id,
    )
}

fn render_inbox(inbox: &NotificationListView) -> String {
    let items = match inbox {
        NotificationListView::Empty => {
            format!(r#"<p class="no-notifications">{}</p>"#, EMPTY_NOTIFICATIONS)
        }
        NotificationListView::Items(items) => items.iter().map(render_notification).collect(),
    };

    format!(
        r#"<section class="inbox">
        <div class="inbox-actions">
            <form method="post" action="/actions/notifications/read-all" class="inline"><button type="submit">Označi sve kao pročitano</button></form>
            <form method="post" action="/actions/notifications/clear-read" class="inline"><button type="submit">Obriši pročitane</button></form>
            <form method="post" action="/actions/notifications/clear-all" class="inline"><button type="submit">Obriši sve</button></form>
        </div>
        {items}
    </section>"#
    )
}
