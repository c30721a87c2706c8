use thiserror::Error;

/// Reasons a single chart cannot be built from its data.
///
/// None of these abort a dashboard: the builder and the router turn each one
/// into a placeholder chart whose title describes the problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("column '{column}' not found in table")]
    MissingColumn { column: String },
    #[error("table has no rows for column '{column}'")]
    EmptyTable { column: String },
    #[error("source table '{name}' is not loaded")]
    MissingSource { name: String },
    #[error("no suitable value column found{}", requested_suffix(.requested))]
    NoSuitableMeasureColumn { requested: Option<String> },
    #[error("unknown chart kind '{kind}'")]
    UnknownChartKind { kind: String },
}

fn requested_suffix(requested: &Option<String>) -> String {
    match requested {
        Some(column) => format!(" ('{}' not in table)", column),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ChartError::MissingColumn { column: "Religion".to_string() };
        assert_eq!(err.to_string(), "column 'Religion' not found in table");

        let err = ChartError::NoSuitableMeasureColumn { requested: None };
        assert_eq!(err.to_string(), "no suitable value column found");

        let err = ChartError::NoSuitableMeasureColumn { requested: Some("Votes".to_string()) };
        assert_eq!(err.to_string(), "no suitable value column found ('Votes' not in table)");
    }
}
