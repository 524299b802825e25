use crate::domain::error::DomainError;

/// Renders charts to an encoded image. Output bytes are returned as-is;
/// callers base64 them for transport.
pub trait ChartRenderer: Send + Sync {
    /// MIME type of what this renderer produces, e.g. `image/svg+xml`.
    fn mime(&self) -> &'static str;

    fn line_chart(&self, spec: &LineChart) -> Result<Vec<u8>, DomainError>;

    fn pie_chart(&self, spec: &PieChart) -> Result<Vec<u8>, DomainError>;
}

#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct PieChart {
    pub title: Option<String>,
    /// `(label, weight)`; weights need not sum to anything in particular.
    pub slices: Vec<(String, f64)>,
}
