use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::core::Currency;

/// Invoice languages for the amount-in-words line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Indonesian,
}

/// Spell out a monetary amount.
///
/// IDR amounts are whole rupiah. USD amounts split dollars and cents and
/// spell both parts ("... dollars and twenty-five cents").
pub fn amount_to_words(amount: Decimal, currency: Currency, lang: Language) -> String {
    let amount = amount.abs();

    match currency {
        Currency::IDR => {
            let whole = amount.round_dp(0).to_u64().unwrap_or(0);
            match lang {
                Language::English => format!("{} rupiah", english_number(whole)),
                Language::Indonesian => format!("{} rupiah", indonesian_number(whole)),
            }
        }
        Currency::USD => {
            let rounded = amount.round_dp(2);
            let whole = rounded.trunc().to_u64().unwrap_or(0);
            let cents = ((rounded - rounded.trunc()) * Decimal::new(100, 0))
                .round_dp(0)
                .to_u64()
                .unwrap_or(0);

            match lang {
                Language::English => {
                    let dollars = format!(
                        "{} {}",
                        english_number(whole),
                        if whole == 1 { "dollar" } else { "dollars" }
                    );
                    if cents == 0 {
                        dollars
                    } else {
                        format!(
                            "{} and {} {}",
                            dollars,
                            english_number(cents),
                            if cents == 1 { "cent" } else { "cents" }
                        )
                    }
                }
                Language::Indonesian => {
                    let dollars = format!("{} dolar", indonesian_number(whole));
                    if cents == 0 {
                        dollars
                    } else {
                        format!("{} dan {} sen", dollars, indonesian_number(cents))
                    }
                }
            }
        }
    }
}

const ENGLISH_UNDER_20: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const ENGLISH_TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

fn english_number(n: u64) -> String {
    if n < 20 {
        return ENGLISH_UNDER_20[n as usize].to_string();
    }
    if n < 100 {
        let tens = ENGLISH_TENS[(n / 10) as usize];
        return if n % 10 == 0 {
            tens.to_string()
        } else {
            format!("{}-{}", tens, ENGLISH_UNDER_20[(n % 10) as usize])
        };
    }
    if n < 1_000 {
        let rest = n % 100;
        let hundreds = format!("{} hundred", english_number(n / 100));
        return if rest == 0 {
            hundreds
        } else {
            format!("{} {}", hundreds, english_number(rest))
        };
    }

    for (scale, name) in [
        (1_000_000_000_000, "trillion"),
        (1_000_000_000, "billion"),
        (1_000_000, "million"),
        (1_000, "thousand"),
    ] {
        if n >= scale {
            let rest = n % scale;
            let head = format!("{} {}", english_number(n / scale), name);
            return if rest == 0 {
                head
            } else {
                format!("{} {}", head, english_number(rest))
            };
        }
    }

    unreachable!("all u64 ranges covered");
}

const INDONESIAN_UNITS: [&str; 12] = [
    "nol", "satu", "dua", "tiga", "empat", "lima", "enam", "tujuh", "delapan", "sembilan",
    "sepuluh", "sebelas",
];

/// Standard terbilang rules: "se-" prefixes for 11–19, 100–199 and
/// 1000–1999 ("sebelas", "seratus", "seribu").
fn indonesian_number(n: u64) -> String {
    match n {
        0..=11 => INDONESIAN_UNITS[n as usize].to_string(),
        12..=19 => format!("{} belas", INDONESIAN_UNITS[(n % 10) as usize]),
        20..=99 => {
            let rest = n % 10;
            let tens = format!("{} puluh", INDONESIAN_UNITS[(n / 10) as usize]);
            if rest == 0 {
                tens
            } else {
                format!("{} {}", tens, indonesian_number(rest))
            }
        }
        100..=199 => {
            let rest = n % 100;
            if rest == 0 {
                "seratus".to_string()
            } else {
                format!("seratus {}", indonesian_number(rest))
            }
        }
        200..=999 => {
            let rest = n % 100;
            let hundreds = format!("{} ratus", INDONESIAN_UNITS[(n / 100) as usize]);
            if rest == 0 {
                hundreds
            } else {
                format!("{} {}", hundreds, indonesian_number(rest))
            }
        }
        1_000..=1_999 => {
            let rest = n % 1_000;
            if rest == 0 {
                "seribu".to_string()
            } else {
                format!("seribu {}", indonesian_number(rest))
            }
        }
        _ => {
            for (scale, name) in [
                (1_000_000_000_000, "triliun"),
                (1_000_000_000, "miliar"),
                (1_000_000, "juta"),
                (1_000, "ribu"),
            ] {
                if n >= scale {
                    let rest = n % scale;
                    let head = format!("{} {}", indonesian_number(n / scale), name);
                    return if rest == 0 {
                        head
                    } else {
                        format!("{} {}", head, indonesian_number(rest))
                    };
                }
            }
            unreachable!("all u64 ranges covered");
        }
    }
}
