//! Global pairwise alignment (Needleman-Wunsch) under a [`CostModel`].
//!
//! `D[i][j]` is the best score of aligning `a[..i]` with `b[..j]`:
//!
//! * `D[i][0] = D[i-1][0] + cost(a[i-1], *)`
//! * `D[0][j] = D[0][j-1] + cost(*, b[j-1])`
//! * `D[i][j] = best(D[i-1][j-1] + cost(a[i-1], b[j-1]), D[i][j-1] + cost(*, b[j-1]), D[i-1][j] + cost(a[i-1], *))`
//!
//! "best" follows the model's [`Objective`](crate::libs::cost::Objective). On ties the
//! diagonal wins over a gap in `a`, which wins over a gap in `b`.

use crate::libs::cost::{CostModel, GAP};
use crate::libs::error::ClusterError;

/// Gap character in aligned strings
pub const GAP_CHAR: u8 = b'-';

/// Which neighbour a cell was reached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    /// Substitution, from `(i-1, j-1)`
    Diagonal,
    /// Gap in `a`, from `(i, j-1)`
    Left,
    /// Gap in `b`, from `(i-1, j)`
    Up,
}

/// An optimal global alignment with its traceback.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub score: f64,
    /// The first sequence, gaps shown as `-`
    pub first: Vec<u8>,
    /// The second sequence, gaps shown as `-`
    pub second: Vec<u8>,
    /// `|` match, `.` mismatch, ` ` gap
    pub markup: Vec<u8>,
}

impl Alignment {
    /// Three lines: first, markup, second.
    pub fn to_text(&self) -> String {
        format!(
            "{}\n{}\n{}\n",
            String::from_utf8_lossy(&self.first),
            String::from_utf8_lossy(&self.markup),
            String::from_utf8_lossy(&self.second)
        )
    }
}

/// Global aligner. Holds nothing but the cost model, so it can be shared freely
/// between threads.
#[derive(Debug, Clone, Copy)]
pub struct Aligner<'a> {
    cost: &'a CostModel,
}

impl<'a> Aligner<'a> {
    pub fn new(cost: &'a CostModel) -> Self {
        Self { cost }
    }

    /// The optimal global alignment score, `D[m][n]`.
    ///
    /// Keeps two rows of the table only.
    ///
    /// ```
    /// use clustree::libs::align::Aligner;
    /// use clustree::libs::cost::CostModel;
    /// let cost = CostModel::unit(b"AT");
    /// let aligner = Aligner::new(&cost);
    /// assert_eq!(aligner.score(b"AAA", b"AAT").unwrap(), 1.0);
    /// ```
    pub fn score(&self, a: &[u8], b: &[u8]) -> Result<f64, ClusterError> {
        let (score, _) = self.fill(a, b, false)?;
        Ok(score)
    }

    /// The optimal global alignment with aligned strings.
    ///
    /// ```
    /// use clustree::libs::align::Aligner;
    /// use clustree::libs::cost::CostModel;
    /// let cost = CostModel::unit(b"ACGT");
    /// let aln = Aligner::new(&cost).align(b"ACGT", b"AGT").unwrap();
    /// assert_eq!(aln.score, 1.0);
    /// assert_eq!(aln.to_text(), "ACGT\n| ||\nA-GT\n");
    /// ```
    pub fn align(&self, a: &[u8], b: &[u8]) -> Result<Alignment, ClusterError> {
        let (score, trace) = self.fill(a, b, true)?;
        let width = b.len() + 1;

        let mut first = Vec::with_capacity(a.len() + b.len());
        let mut second = Vec::with_capacity(a.len() + b.len());
        let mut markup = Vec::with_capacity(a.len() + b.len());

        let (mut i, mut j) = (a.len(), b.len());
        loop {
            match trace[i * width + j] {
                Step::Start => break,
                Step::Diagonal => {
                    let (x, y) = (a[i - 1], b[j - 1]);
                    first.push(x);
                    second.push(y);
                    markup.push(if x.eq_ignore_ascii_case(&y) { b'|' } else { b'.' });
                    i -= 1;
                    j -= 1;
                }
                Step::Left => {
                    first.push(GAP_CHAR);
                    second.push(b[j - 1]);
                    markup.push(b' ');
                    j -= 1;
                }
                Step::Up => {
                    first.push(a[i - 1]);
                    second.push(GAP_CHAR);
                    markup.push(b' ');
                    i -= 1;
                }
            }
        }

        first.reverse();
        second.reverse();
        markup.reverse();

        Ok(Alignment {
            score,
            first,
            second,
            markup,
        })
    }

    /// Fill the table row by row. The full `(m+1) x (n+1)` step table is only kept
    /// when `keep_trace` is set.
    fn fill(&self, a: &[u8], b: &[u8], keep_trace: bool) -> Result<(f64, Vec<Step>), ClusterError> {
        if a.is_empty() || b.is_empty() {
            return Err(ClusterError::InvalidInput(
                "cannot align an empty sequence".to_string(),
            ));
        }

        let objective = self.cost.objective();
        let width = b.len() + 1;

        // cost(*, b[j-1]) is needed once per row
        let insert: Vec<f64> = b
            .iter()
            .map(|&y| self.cost.get(GAP, y))
            .collect::<Result<_, _>>()?;

        let mut trace = if keep_trace {
            vec![Step::Start; (a.len() + 1) * width]
        } else {
            vec![]
        };

        let mut prev = vec![0.0; width];
        let mut curr = vec![0.0; width];
        for j in 1..width {
            prev[j] = prev[j - 1] + insert[j - 1];
            if keep_trace {
                trace[j] = Step::Left;
            }
        }

        for i in 1..=a.len() {
            let x = a[i - 1];
            let delete = self.cost.get(x, GAP)?;

            curr[0] = prev[0] + delete;
            if keep_trace {
                trace[i * width] = Step::Up;
            }

            for j in 1..width {
                let mut best = prev[j - 1] + self.cost.get(x, b[j - 1])?;
                let mut step = Step::Diagonal;

                let left = curr[j - 1] + insert[j - 1];
                if objective.is_better(left, best) {
                    best = left;
                    step = Step::Left;
                }

                let up = prev[j] + delete;
                if objective.is_better(up, best) {
                    best = up;
                    step = Step::Up;
                }

                curr[j] = best;
                if keep_trace {
                    trace[i * width + j] = step;
                }
            }

            std::mem::swap(&mut prev, &mut curr);
        }

        Ok((prev[width - 1], trace))
    }
}
