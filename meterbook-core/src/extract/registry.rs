//! Known worksheets and how each one is post-processed

/// Logical key of an extracted table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SheetKey {
    CustomerDetails,
    ExportKwh,
    MeteoForecast,
    TimeLookup,
}

impl SheetKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetKey::CustomerDetails => "customer_details",
            SheetKey::ExportKwh => "export_kwh",
            SheetKey::MeteoForecast => "meteo_forecast",
            SheetKey::TimeLookup => "time_lookup",
        }
    }

    /// Human-readable title, e.g. `export_kwh` -> `Export Kwh`
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

impl std::fmt::Display for SheetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which columns of a worksheet hold dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateColumns {
    None,
    /// Exactly this column, which must exist
    Named(&'static str),
    /// Every column whose name contains one of these substrings (case-sensitive)
    Containing(&'static [&'static str]),
}

impl DateColumns {
    /// Names of the date columns among `columns`, in column order
    pub fn select<'a>(&self, columns: &'a [String]) -> Vec<&'a str> {
        match self {
            DateColumns::None => Vec::new(),
            DateColumns::Named(name) => columns
                .iter()
                .filter(|c| c.as_str() == *name)
                .map(String::as_str)
                .take(1)
                .collect(),
            DateColumns::Containing(needles) => columns
                .iter()
                .filter(|c| needles.iter().any(|needle| c.contains(needle)))
                .map(String::as_str)
                .collect(),
        }
    }
}

/// One known worksheet
#[derive(Debug, Clone, Copy)]
pub struct SheetRule {
    /// Worksheet name as it appears in the workbook
    pub sheet: &'static str,
    pub key: SheetKey,
    pub dates: DateColumns,
}

/// Worksheets extracted by [`extract`](super::extract), in extraction order
pub const SHEET_RULES: &[SheetRule] = &[
    SheetRule {
        sheet: "Customer Details",
        key: SheetKey::CustomerDetails,
        dates: DateColumns::None,
    },
    SheetRule {
        sheet: "Export kWh",
        key: SheetKey::ExportKwh,
        dates: DateColumns::Named("Date"),
    },
    SheetRule {
        sheet: "Meteo Forecast kW",
        key: SheetKey::MeteoForecast,
        dates: DateColumns::Containing(&["Time", "Date"]),
    },
    SheetRule {
        sheet: "Time Lookup",
        key: SheetKey::TimeLookup,
        dates: DateColumns::None,
    },
];

/// Rule for a logical key
pub fn rule_for(key: SheetKey) -> Option<&'static SheetRule> {
    SHEET_RULES.iter().find(|rule| rule.key == key)
}
