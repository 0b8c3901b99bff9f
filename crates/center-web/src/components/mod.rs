mod metric_card;
mod notice;
mod plotly_chart;
mod sidebar;
mod tabs;

pub use metric_card::MetricCards;
pub use notice::NoticeBox;
pub use plotly_chart::{PlotlyChart, plotly_script};
pub use sidebar::Sidebar;
pub use tabs::{TabBar, page_href};
