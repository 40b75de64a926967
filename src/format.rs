//! Display formatting for labels and KPI cards (pt-BR conventions).

const MONTHS: [&str; 12] = [
	"Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// `2024-03` or `2024-03-15` to `Mar 2024`. Anything else comes back unchanged.
pub fn format_month(raw: &str) -> String {
	let mut parts = raw.trim().split('-');
	let (Some(year), Some(month)) = (parts.next(), parts.next()) else {
		return raw.to_string();
	};
	match (year.parse::<u32>(), month.parse::<usize>()) {
		(Ok(year), Ok(month @ 1..=12)) => format!("{} {}", MONTHS[month - 1], year),
		_ => raw.to_string(),
	}
}

/// Month label for a zero-based month index, for synthetic series.
pub fn month_label(index: usize, year: u32) -> String {
	format!("{} {}", MONTHS[index % 12], year)
}

/// Groups the integer part with dots: `1234567` to `1.234.567`.
pub fn format_number(value: f64) -> String {
	let rounded = value.round();
	let digits = format!("{:.0}", rounded.abs());
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push('.');
		}
		grouped.push(ch);
	}
	if rounded < 0.0 {
		format!("-{grouped}")
	} else {
		grouped
	}
}

/// Whole reais: `R$ 1.234.567`.
pub fn format_currency(value: f64) -> String {
	let number = format_number(value);
	match number.strip_prefix('-') {
		Some(abs) => format!("-R$ {abs}"),
		None => format!("R$ {number}"),
	}
}

/// A ratio as a percentage with one decimal: `0.123` to `12.3%`.
pub fn format_percentage(ratio: f64) -> String {
	format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn months_use_portuguese_abbreviations() {
		assert_eq!(format_month("2024-03"), "Mar 2024");
		assert_eq!(format_month("2023-12-01"), "Dez 2023");
		assert_eq!(format_month("2024-02"), "Fev 2024");
		assert_eq!(format_month("2024-13"), "2024-13");
		assert_eq!(format_month("março"), "março");
		assert_eq!(month_label(6, 2024), "Jul 2024");
	}

	#[test]
	fn currency_groups_thousands() {
		assert_eq!(format_currency(1_234_567.4), "R$ 1.234.567");
		assert_eq!(format_currency(999.5), "R$ 1.000");
		assert_eq!(format_currency(0.0), "R$ 0");
		assert_eq!(format_currency(-12_345.0), "-R$ 12.345");
	}

	#[test]
	fn numbers_and_percentages() {
		assert_eq!(format_number(100.0), "100");
		assert_eq!(format_number(1000.0), "1.000");
		assert_eq!(format_percentage(0.123), "12.3%");
		assert_eq!(format_percentage(1.0), "100.0%");
	}
}
