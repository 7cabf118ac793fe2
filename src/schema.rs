/// Semantic format of a field. Only used as documentation, the decoder never enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// A date written as `DDMMYYYY`
    DayMonthYear,
}

impl FieldFormat {
    /// The textual pattern of the format
    pub fn pattern(&self) -> &'static str {
        match self {
            FieldFormat::DayMonthYear => "DDMMYYYY",
        }
    }
}

/// A single fixed-width field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Width of the field in bytes
    pub width: usize,
    pub format: Option<FieldFormat>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            format: None,
        }
    }

    pub const fn date(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            format: Some(FieldFormat::DayMonthYear),
        }
    }
}

/// A two level fixed-width layout: one header segment followed by a repeated segment. The amount
/// of repetitions is read from the header field at `count_field`.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub header: &'static [FieldSpec],
    pub repeated: &'static [FieldSpec],
    /// Position of the repeat count within `header`
    pub count_field: usize,
    /// Key under which the repeated segments are exposed
    pub repeated_key: &'static str,
}

impl Schema {
    /// Total width of the header segment in bytes
    pub fn header_width(&self) -> usize {
        self.header.iter().map(|f| f.width).sum()
    }

    /// Width of a single repeated segment in bytes
    pub fn repeated_width(&self) -> usize {
        self.repeated.iter().map(|f| f.width).sum()
    }

    /// Name of the field holding the repeat count
    #[inline]
    pub fn count_field_name(&self) -> &'static str {
        self.header[self.count_field].name
    }

    /// Length of a full line with `count` repeated segments, without line terminator
    pub fn line_width(&self, count: usize) -> usize {
        self.header_width() + count * self.repeated_width()
    }
}

/// Header segment of a deposit record
pub const DEPOSIT_SEGMENT: [FieldSpec; 18] = [
    FieldSpec::new("Record number", 10),
    FieldSpec::new("deposit type code", 10),
    FieldSpec::new("account number", 30),
    FieldSpec::new("position reference number", 30),
    FieldSpec::new("currency", 3),
    FieldSpec::new("principal balance", 30),
    FieldSpec::new("principal balance + accrued interest", 30),
    FieldSpec::new("interest rate", 20),
    FieldSpec::new("interest rate indicator", 1),
    FieldSpec::new("% above/below benchmark rate", 20),
    FieldSpec::date("last interest pay date", 8),
    FieldSpec::date("next interest pay date", 8),
    FieldSpec::date("value date", 8),
    FieldSpec::date("maturity date", 8),
    FieldSpec::new("number of depositor(s)", 3),
    FieldSpec::new("trust/client Indicator", 1),
    FieldSpec::new("encumbrances indicator", 1),
    FieldSpec::new("deposit account status indicator", 1),
];

/// One depositor, repeated `number of depositor(s)` times after the header segment
pub const DEPOSITOR_SEGMENT: [FieldSpec; 22] = [
    FieldSpec::new("depositor name", 100),
    FieldSpec::new("customer type", 1),
    FieldSpec::new("identity document type indicator", 1),
    FieldSpec::new("ID/passport number", 20),
    FieldSpec::date("date of birth", 8),
    FieldSpec::new("BR/CI number", 20),
    FieldSpec::new("BR number of sole proprietorship", 20),
    FieldSpec::new("name of sole proprietor", 100),
    FieldSpec::new("ID/passport number of sole proprietor", 20),
    FieldSpec::new("BR number of partnership", 20),
    FieldSpec::new("ATM card indicator", 1),
    FieldSpec::new("internet banking indicator", 1),
    FieldSpec::new("NOT IN USE", 3),
    FieldSpec::new("address status indicator", 1),
    FieldSpec::new("address 1", 50),
    FieldSpec::new("address 2", 50),
    FieldSpec::new("address 3", 50),
    FieldSpec::new("address 4", 50),
    FieldSpec::new("address 5", 50),
    FieldSpec::new("telephone number", 20),
    FieldSpec::new("mobile phone number", 20),
    FieldSpec::new("email address", 50),
];

/// The deposit protection scheme data file layout
pub const DEPOSIT_PROTECTION: Schema = Schema {
    header: &DEPOSIT_SEGMENT,
    repeated: &DEPOSITOR_SEGMENT,
    count_field: 14,
    repeated_key: "depositors",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        let header: Vec<_> = DEPOSIT_SEGMENT.iter().map(|f| f.width).collect();
        assert_eq!(
            header,
            vec![10, 10, 30, 30, 3, 30, 30, 20, 1, 20, 8, 8, 8, 8, 3, 1, 1, 1]
        );

        let repeated: Vec<_> = DEPOSITOR_SEGMENT.iter().map(|f| f.width).collect();
        assert_eq!(
            repeated,
            vec![100, 1, 1, 20, 8, 20, 20, 100, 20, 20, 1, 1, 3, 1, 50, 50, 50, 50, 50, 20, 20, 50]
        );

        assert_eq!(DEPOSIT_PROTECTION.header_width(), 221);
        assert_eq!(DEPOSIT_PROTECTION.repeated_width(), 656);
        assert_eq!(DEPOSIT_PROTECTION.line_width(2), 221 + 2 * 656);
    }

    #[test]
    fn test_count_field() {
        assert_eq!(
            DEPOSIT_PROTECTION.count_field_name(),
            "number of depositor(s)"
        );
        assert_eq!(DEPOSIT_PROTECTION.header[14].width, 3);
    }

    #[test]
    fn test_date_tags() {
        let header_dates = DEPOSIT_SEGMENT
            .iter()
            .filter(|f| f.format == Some(FieldFormat::DayMonthYear))
            .count();
        let repeated_dates: Vec<_> = DEPOSITOR_SEGMENT
            .iter()
            .filter(|f| f.format.is_some())
            .map(|f| f.name)
            .collect();

        assert_eq!(header_dates, 4);
        assert_eq!(repeated_dates, vec!["date of birth"]);
        assert_eq!(FieldFormat::DayMonthYear.pattern(), "DDMMYYYY");
    }
}
