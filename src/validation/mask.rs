//! Digit masks for identification fields

/// Input mask applied to a digits-only field on every keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    /// `000.000.000-00`
    Cpf,
    /// `(00) 00000-0000`
    Phone,
    /// `00/00/0000`
    BirthDate,
    /// `00000-000`
    Cep,
}

impl MaskKind {
    /// Maximum number of digits kept; extra input is dropped
    pub const fn max_digits(self) -> usize {
        match self {
            Self::Cpf | Self::Phone => 11,
            Self::BirthDate | Self::Cep => 8,
        }
    }

    /// Fewest digits that make a complete value
    pub const fn min_digits(self) -> usize {
        match self {
            Self::Phone => 10,
            other => other.max_digits(),
        }
    }

    /// Separators as (digit offset, literal); each literal is emitted right
    /// before the digit at that offset. A complete 10-digit phone is a
    /// landline and takes the shorter `(00) 0000-0000` layout.
    const fn separators(self, digits: usize) -> &'static [(usize, &'static str)] {
        match self {
            Self::Cpf => &[(3, "."), (6, "."), (9, "-")],
            Self::Phone if digits == 10 => &[(0, "("), (2, ") "), (6, "-")],
            Self::Phone => &[(0, "("), (2, ") "), (7, "-")],
            Self::BirthDate => &[(2, "/"), (4, "/")],
            Self::Cep => &[(5, "-")],
        }
    }

    /// Placeholder shown while the field is empty
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Cpf => "000.000.000-00",
            Self::Phone => "(00) 00000-0000",
            Self::BirthDate => "DD/MM/AAAA",
            Self::Cep => "00000-000",
        }
    }

    /// Canonical display form of `input`
    pub fn apply(self, input: &str) -> String {
        let mut digits = digits_only(input);
        digits.truncate(self.max_digits());
        let separators = self.separators(digits.len());
        let mut out = String::with_capacity(self.placeholder().len());

        for (i, d) in digits.chars().enumerate() {
            for (offset, literal) in separators {
                if *offset == i {
                    out.push_str(literal);
                }
            }
            out.push(d);
        }

        out
    }

    /// Remove the last digit and re-mask, so deleting never leaves a dangling
    /// separator behind.
    pub fn pop_digit(self, value: &str) -> String {
        let mut digits = digits_only(value);
        digits.pop();
        self.apply(&digits)
    }

    pub fn is_complete(self, value: &str) -> bool {
        let count = digits_only(value).len();
        count >= self.min_digits() && count <= self.max_digits()
    }
}

/// Strip every character that is not an ASCII digit
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}
