//! Panel stylesheet
//!
//! Injected once per document under `constants::panel::STYLE_ID`. Selectors
//! match the class names in `constants::css`.

pub const STYLESHEET: &str = r#"
.pytorn-stats-panel {
    position: fixed;
    z-index: 9999;
    background-color: rgba(0, 0, 0, 0.8);
    color: #fff;
    padding: 10px;
    border-radius: 5px;
    font-size: 12px;
    font-family: 'Arial', sans-serif;
}
.pytorn-stats-panel.top-right {
    top: 10px;
    right: 10px;
}
.pytorn-stats-panel.top-left {
    top: 10px;
    left: 10px;
}
.pytorn-stats-panel.bottom-right {
    bottom: 10px;
    right: 10px;
}
.pytorn-stats-panel.bottom-left {
    bottom: 10px;
    left: 10px;
}
.pytorn-stat {
    margin-bottom: 5px;
    display: flex;
    flex-wrap: wrap;
    justify-content: space-between;
}
.pytorn-stat-label {
    margin-right: 10px;
}
.pytorn-stat-value {
    font-weight: bold;
}
.pytorn-progress {
    height: 4px;
    width: 100%;
    background-color: #444;
    margin-top: 2px;
    border-radius: 2px;
    overflow: hidden;
}
.pytorn-progress-bar {
    height: 100%;
    border-radius: 2px;
}
.pytorn-progress-energy .pytorn-progress-bar {
    background-color: #7cc833;
}
.pytorn-progress-nerve .pytorn-progress-bar {
    background-color: #ff7373;
}
.pytorn-progress-happy .pytorn-progress-bar {
    background-color: #e3e338;
}
.pytorn-progress-life .pytorn-progress-bar {
    background-color: #71aad6;
}
"#;
