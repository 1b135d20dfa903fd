use crate::libs::error::ClusterError;
use anyhow::{anyhow, bail, Result};
use std::cmp::Ordering;
use std::io::BufRead;

/// The symbol standing for an insertion or deletion in a cost matrix.
pub const GAP: u8 = b'*';

/// Which end of the scale is the good one.
///
/// Shared by the aligner and the candidate queue, so "best" means the same thing
/// in both places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    /// Values are costs; lower is better.
    #[default]
    Minimize,
    /// Values are similarities; higher is better.
    Maximize,
}

impl Objective {
    /// Orders two scores by preference. `Greater` means `a` is better than `b`.
    ///
    /// ```
    /// use clustree::libs::cost::Objective;
    /// use std::cmp::Ordering;
    /// assert_eq!(Objective::Minimize.compare(1.0, 2.0), Ordering::Greater);
    /// assert_eq!(Objective::Maximize.compare(1.0, 2.0), Ordering::Less);
    /// assert_eq!(Objective::Maximize.compare(0.0, -0.0), Ordering::Equal);
    /// ```
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Objective::Minimize => ord.reverse(),
            Objective::Maximize => ord,
        }
    }

    /// `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

/// A substitution/gap cost table over a byte alphabet.
///
/// Stores entries for all pairs of bytes (256x256); unset entries are reported as
/// configuration errors when read. ASCII letters are case-insensitive.
#[derive(Debug, Clone)]
pub struct CostModel {
    matrix: Vec<Option<f64>>,
    alphabet: Vec<u8>,
    objective: Objective,
}

impl CostModel {
    /// An empty model over `alphabet`. The gap symbol is implied and never part of
    /// the alphabet.
    pub fn new(alphabet: &[u8]) -> Self {
        let mut symbols: Vec<u8> = Vec::with_capacity(alphabet.len());
        for &b in alphabet {
            if b != GAP && !symbols.contains(&b) {
                symbols.push(b);
            }
        }

        CostModel {
            matrix: vec![None; 256 * 256],
            alphabet: symbols,
            objective: Objective::default(),
        }
    }

    /// Edit distance: match 0, mismatch 1, gap 1, minimized.
    ///
    /// ```
    /// use clustree::libs::cost::{CostModel, GAP};
    /// let m = CostModel::unit(b"ACGT");
    /// assert_eq!(m.get(b'A', b'A').unwrap(), 0.0);
    /// assert_eq!(m.get(b'A', b't').unwrap(), 1.0);
    /// assert_eq!(m.get(GAP, b'G').unwrap(), 1.0);
    /// ```
    pub fn unit(alphabet: &[u8]) -> Self {
        let mut model = Self::new(alphabet);
        let symbols = model.alphabet.clone();
        for &a in &symbols {
            for &b in &symbols {
                model.set(a, b, if a == b { 0.0 } else { 1.0 });
            }
        }
        model.set_gap(1.0);
        model
    }

    /// Load from a preset name or a file.
    ///
    /// The only preset is `unit`, edit distance over `ACGT`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "unit" => Ok(Self::unit(b"ACGT")),
            _ => Self::from_file(name),
        }
    }

    /// Load a cost matrix from a file. See [`CostModel::from_reader`] for the format.
    pub fn from_file(path: &str) -> Result<Self> {
        let reader = crate::reader(path)?;
        Self::from_reader(reader).map_err(|e| anyhow!("{}: {}", path, e))
    }

    /// Parse a cost matrix.
    ///
    /// Lines starting with `#` are comments. The first other line lists the symbols,
    /// separated by whitespace; include `*` to supply gap costs. Each following line
    /// is a row symbol, in header order, followed by one number per column.
    ///
    /// Columns are the first symbol: `cost(column, row)` is the number found there.
    /// Deleting `x` costs the `*` row at column `x`; inserting `y` costs row `y` at
    /// column `*`.
    ///
    /// ```
    /// use clustree::libs::cost::{CostModel, GAP};
    /// let text = "# unit costs\nA T *\nA 0 1 1\nT 1 0 1\n* 1 1 0\n";
    /// let m = CostModel::from_reader(text.as_bytes()).unwrap();
    /// assert_eq!(m.alphabet(), b"AT");
    /// assert_eq!(m.get(b'T', GAP).unwrap(), 1.0);
    /// assert_eq!(m.get(GAP, b'T').unwrap(), 1.0);
    /// assert!(m.validate().is_ok());
    /// ```
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = vec![];
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            lines.push((i + 1, line.to_string()));
        }
        let mut lines = lines.into_iter();

        let Some((lineno, first)) = lines.next() else {
            bail!("no alphabet line found");
        };
        let header = first
            .split_whitespace()
            .map(|part| parse_symbol(part, lineno))
            .collect::<Result<Vec<u8>>>()?;

        let mut model = CostModel::new(&header);
        let mut rows_read = 0;

        for (lineno, line) in lines {
            if rows_read == header.len() {
                bail!("line {}: more rows than header symbols", lineno);
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let row = parse_symbol(parts[0], lineno)?;
            if row != header[rows_read] {
                bail!(
                    "line {}: expected row '{}', found '{}'",
                    lineno,
                    char::from(header[rows_read]),
                    char::from(row)
                );
            }
            if parts.len() - 1 != header.len() {
                bail!(
                    "line {}: expected {} values, found {}",
                    lineno,
                    header.len(),
                    parts.len() - 1
                );
            }

            for (&col, value) in header.iter().zip(&parts[1..]) {
                let cost: f64 = value
                    .parse()
                    .map_err(|_| anyhow!("line {}: invalid cost '{}'", lineno, value))?;
                if !cost.is_finite() {
                    bail!("line {}: cost '{}' is not finite", lineno, value);
                }
                model.set(col, row, cost);
            }
            rows_read += 1;
        }

        if rows_read < header.len() {
            bail!("missing row for '{}'", char::from(header[rows_read]));
        }

        Ok(model)
    }

    /// Set `cost(first, second)`, for every case combination of ASCII letters.
    pub fn set(&mut self, first: u8, second: u8, cost: f64) {
        for r in case_variants(first) {
            for c in case_variants(second) {
                self.matrix[index(r, c)] = Some(cost);
            }
        }
    }

    /// Set a linear gap cost for every alphabet symbol, in both directions.
    pub fn set_gap(&mut self, cost: f64) {
        for a in self.alphabet.clone() {
            self.set(a, GAP, cost);
            self.set(GAP, a, cost);
        }
    }

    /// Look up `cost(first, second)`.
    pub fn get(&self, first: u8, second: u8) -> Result<f64, ClusterError> {
        self.matrix[index(first, second)].ok_or(ClusterError::Configuration { first, second })
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Checks the model is total over `alphabet x (alphabet + gap)` and `gap x alphabet`.
    pub fn validate(&self) -> Result<(), ClusterError> {
        for &a in &self.alphabet {
            self.get(a, GAP)?;
            self.get(GAP, a)?;
            for &b in &self.alphabet {
                self.get(a, b)?;
            }
        }
        Ok(())
    }
}

fn index(first: u8, second: u8) -> usize {
    (first as usize) * 256 + (second as usize)
}

fn case_variants(b: u8) -> Vec<u8> {
    if b.is_ascii_alphabetic() {
        vec![b.to_ascii_uppercase(), b.to_ascii_lowercase()]
    } else {
        vec![b]
    }
}

fn parse_symbol(part: &str, lineno: usize) -> Result<u8> {
    match part.as_bytes() {
        [b] => Ok(*b),
        _ => bail!("line {}: '{}' is not a single symbol", lineno, part),
    }
}
