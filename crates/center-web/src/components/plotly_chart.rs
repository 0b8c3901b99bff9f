use center_ledger::charts::PlotlyFigure;
use leptos::prelude::*;

/// Inline script that draws `figure` into its element once the page loads.
///
/// `</` is escaped so chart text can never close the script tag early.
pub fn plotly_script(figure: &PlotlyFigure) -> String {
    let id = serde_json::to_string(&figure.id).unwrap_or_else(|_| "\"\"".to_string());
    let fig = figure.figure.to_string().replace("</", "<\\/");
    format!(
        "(function(){{var f={};Plotly.newPlot({},f.data,f.layout,{{responsive:true,displaylogo:false}});}})();",
        fig, id
    )
}

/// A plotly.js chart container plus its draw script
#[component]
pub fn PlotlyChart(figure: PlotlyFigure) -> impl IntoView {
    let script = plotly_script(&figure);

    view! {
        <div class="chart">
            <div id=figure.id class="chart-canvas"></div>
            <script inner_html=script></script>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plotly_script_targets_element() {
        let figure = PlotlyFigure {
            id: "combined-pnl".into(),
            figure: json!({ "data": [], "layout": { "height": 650 } }),
        };
        let script = plotly_script(&figure);
        assert!(script.contains("Plotly.newPlot(\"combined-pnl\""));
        assert!(script.contains("\"height\":650"));
    }

    #[test]
    fn test_plotly_script_escapes_closing_tags() {
        let figure = PlotlyFigure {
            id: "x".into(),
            figure: json!({ "layout": { "title": { "text": "</script><b>" } } }),
        };
        let script = plotly_script(&figure);
        assert!(!script.contains("</script>"));
        assert!(script.contains("<\\/script>"));
    }
}
