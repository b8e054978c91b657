//! Dashboard view model
//!
//! The retained state every renderer writes into and the TUI draws from.
//! Elements are addressed by the same IDs the web dashboard used, and every
//! value cell belongs to exactly one [`Section`].

use crate::consts::dashboard_consts::labels;

/// Independently fetched region of the dashboard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    Kimp,
    Position,
    Pnl,
    Health,
    Emergency,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Kimp,
        Section::Position,
        Section::Pnl,
        Section::Health,
        Section::Emergency,
    ];

    /// Value cells that receive the error indicator when this section fails.
    pub fn value_cells(&self) -> &'static [ElementId] {
        match self {
            Section::Kimp => &[ElementId::CurrentKimp, ElementId::UsdKrw],
            Section::Position => &[ElementId::TotalInvested],
            Section::Pnl => &[
                ElementId::EntryKimp,
                ElementId::BreakevenKimp,
                ElementId::KimpProfit,
                ElementId::NetProfit,
                ElementId::ProfitStatus,
            ],
            Section::Health => &[ElementId::SystemStatus],
            Section::Emergency => &[ElementId::EmergencyStatus],
        }
    }
}

/// Addressable elements of the dashboard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementId {
    CurrentKimp,
    UsdKrw,
    TotalInvested,
    PositionsTable,
    EntryKimp,
    BreakevenKimp,
    KimpProfit,
    NetProfit,
    ProfitStatus,
    SystemStatus,
    EmergencyStatus,
    KimpChart,
    LastUpdated,
    ErrorOverlay,
    ErrorMessage,
}

impl ElementId {
    pub const ALL: [ElementId; 15] = [
        ElementId::CurrentKimp,
        ElementId::UsdKrw,
        ElementId::TotalInvested,
        ElementId::PositionsTable,
        ElementId::EntryKimp,
        ElementId::BreakevenKimp,
        ElementId::KimpProfit,
        ElementId::NetProfit,
        ElementId::ProfitStatus,
        ElementId::SystemStatus,
        ElementId::EmergencyStatus,
        ElementId::KimpChart,
        ElementId::LastUpdated,
        ElementId::ErrorOverlay,
        ElementId::ErrorMessage,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ElementId::CurrentKimp => "currentKimp",
            ElementId::UsdKrw => "usdKrw",
            ElementId::TotalInvested => "totalInvested",
            ElementId::PositionsTable => "positionsTable",
            ElementId::EntryKimp => "entryKimp",
            ElementId::BreakevenKimp => "breakevenKimp",
            ElementId::KimpProfit => "kimpProfit",
            ElementId::NetProfit => "netProfit",
            ElementId::ProfitStatus => "profitStatus",
            ElementId::SystemStatus => "systemStatus",
            ElementId::EmergencyStatus => "emergencyStatus",
            ElementId::KimpChart => "kimpChart",
            ElementId::LastUpdated => "lastUpdated",
            ElementId::ErrorOverlay => "errorOverlay",
            ElementId::ErrorMessage => "errorMessage",
        }
    }

    /// The section owning this element, if any.
    pub fn section(&self) -> Option<Section> {
        Section::ALL
            .into_iter()
            .find(|section| section.value_cells().contains(self))
    }
}

/// Sign-dependent styling of a value.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Tone {
    #[default]
    Neutral,
    Profit,
    Loss,
    Error,
}

impl Tone {
    /// Zero counts as profit.
    pub fn for_value(value: f64) -> Self {
        if value >= 0.0 { Tone::Profit } else { Tone::Loss }
    }
}

/// A single text value on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
    /// True until the first successful render (the web skeleton state).
    pub loading: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            text: labels::LOADING.to_string(),
            tone: Tone::Neutral,
            loading: true,
        }
    }
}

impl Cell {
    pub fn set(&mut self, text: impl Into<String>, tone: Tone) {
        self.text = text.into();
        self.tone = tone;
        self.loading = false;
    }

    pub fn mark_error(&mut self) {
        self.text = labels::ERROR_INDICATOR.to_string();
        self.tone = Tone::Error;
    }

    pub fn is_error(&self) -> bool {
        self.tone == Tone::Error
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionRow {
    pub symbol: String,
    pub quantity: String,
    pub entry_price: String,
    pub current_price: String,
    pub pnl: String,
    pub pnl_tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PositionsTable {
    #[default]
    Loading,
    /// No open position placeholder.
    Empty,
    Rows(Vec<PositionRow>),
}

/// One dependency on the system status panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceIndicator {
    pub name: String,
    pub up: bool,
}

/// Premium history chart. Created once and updated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KimpChart {
    pub labels: Vec<String>,
    /// `None` marks a gap.
    pub values: Vec<Option<f64>>,
    /// Number of in-place updates applied so far.
    pub revision: u64,
}

impl KimpChart {
    /// Replaces both series wholesale.
    pub fn replace(&mut self, labels: Vec<String>, values: Vec<Option<f64>>) {
        self.labels = labels;
        self.values = values;
        self.revision += 1;
    }

    pub fn has_data(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }

    /// `(index, value)` runs split at every gap.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (i, value) in self.values.iter().enumerate() {
            match value {
                Some(v) => current.push((i as f64, *v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorOverlay {
    pub visible: bool,
    pub message: String,
}

/// Everything the dashboard displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub current_kimp: Cell,
    pub usd_krw: Cell,
    pub total_invested: Cell,
    pub positions_table: PositionsTable,
    pub entry_kimp: Cell,
    pub breakeven_kimp: Cell,
    pub kimp_profit: Cell,
    pub net_profit: Cell,
    pub profit_status: Cell,
    pub system_status: Cell,
    pub services: Vec<ServiceIndicator>,
    pub emergency_status: Cell,
    /// Last known emergency-stop state; `None` until first fetched.
    pub emergency_stopped: Option<bool>,
    pub chart: Option<KimpChart>,
    pub last_updated: Option<String>,
    pub overlay: ErrorOverlay,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the chart instance unless it already exists.
    pub fn ensure_chart(&mut self) -> &mut KimpChart {
        self.chart.get_or_insert_with(KimpChart::default)
    }

    pub fn cell(&self, id: ElementId) -> Option<&Cell> {
        match id {
            ElementId::CurrentKimp => Some(&self.current_kimp),
            ElementId::UsdKrw => Some(&self.usd_krw),
            ElementId::TotalInvested => Some(&self.total_invested),
            ElementId::EntryKimp => Some(&self.entry_kimp),
            ElementId::BreakevenKimp => Some(&self.breakeven_kimp),
            ElementId::KimpProfit => Some(&self.kimp_profit),
            ElementId::NetProfit => Some(&self.net_profit),
            ElementId::ProfitStatus => Some(&self.profit_status),
            ElementId::SystemStatus => Some(&self.system_status),
            ElementId::EmergencyStatus => Some(&self.emergency_status),
            _ => None,
        }
    }

    pub fn cell_mut(&mut self, id: ElementId) -> Option<&mut Cell> {
        match id {
            ElementId::CurrentKimp => Some(&mut self.current_kimp),
            ElementId::UsdKrw => Some(&mut self.usd_krw),
            ElementId::TotalInvested => Some(&mut self.total_invested),
            ElementId::EntryKimp => Some(&mut self.entry_kimp),
            ElementId::BreakevenKimp => Some(&mut self.breakeven_kimp),
            ElementId::KimpProfit => Some(&mut self.kimp_profit),
            ElementId::NetProfit => Some(&mut self.net_profit),
            ElementId::ProfitStatus => Some(&mut self.profit_status),
            ElementId::SystemStatus => Some(&mut self.system_status),
            ElementId::EmergencyStatus => Some(&mut self.emergency_status),
            _ => None,
        }
    }

    /// Puts the error indicator into every value cell of `section`.
    pub fn mark_section_error(&mut self, section: Section) {
        for id in section.value_cells() {
            if let Some(cell) = self.cell_mut(*id) {
                cell.mark_error();
            }
        }
    }

    pub fn section_has_error(&self, section: Section) -> bool {
        section
            .value_cells()
            .iter()
            .filter_map(|id| self.cell(*id))
            .any(Cell::is_error)
    }

    /// Plain text content of an element, as a reader of the page would see it.
    pub fn text(&self, id: ElementId) -> Option<String> {
        if let Some(cell) = self.cell(id) {
            return Some(cell.text.clone());
        }
        match id {
            ElementId::PositionsTable => Some(match &self.positions_table {
                PositionsTable::Loading => labels::LOADING.to_string(),
                PositionsTable::Empty => labels::NO_OPEN_POSITION.to_string(),
                PositionsTable::Rows(rows) => rows
                    .iter()
                    .map(|row| {
                        format!(
                            "{} {} {} {} {}",
                            row.symbol, row.quantity, row.entry_price, row.current_price, row.pnl
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            }),
            ElementId::KimpChart => self.chart.as_ref().map(|chart| {
                chart
                    .labels
                    .iter()
                    .zip(&chart.values)
                    .map(|(label, value)| match value {
                        Some(v) => format!("{} {:.2}", label, v),
                        None => format!("{} {}", label, labels::MISSING),
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
            ElementId::LastUpdated => self.last_updated.clone(),
            ElementId::ErrorMessage => Some(self.overlay.message.clone()),
            _ => None,
        }
    }

    /// Text of every element that has any, in contract order.
    pub fn text_snapshot(&self) -> Vec<(ElementId, String)> {
        ElementId::ALL
            .into_iter()
            .filter_map(|id| self.text(id).map(|text| (id, text)))
            .collect()
    }
}
