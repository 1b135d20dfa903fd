use crate::libs::error::ClusterError;
use crate::libs::phylo::NodeId;
use std::collections::BTreeMap;

/// An input sequence. Its id doubles as the id of its leaf in the dendrogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: NodeId,
    /// Label used for output only
    pub name: String,
    pub symbols: Vec<u8>,
}

/// Sequences keyed by positive id. Ids are unique but need not be contiguous.
#[derive(Debug, Clone, Default)]
pub struct SeqSet {
    seqs: BTreeMap<NodeId, Sequence>,
}

impl SeqSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sequence under an explicit id.
    ///
    /// ```
    /// use clustree::libs::seq::SeqSet;
    /// let mut set = SeqSet::new();
    /// set.insert(7, "seq7", "ACGT").unwrap();
    /// assert!(set.insert(7, "again", "AC").is_err());
    /// assert!(set.insert(0, "zero", "AC").is_err());
    /// assert_eq!(set.max_id(), Some(7));
    /// ```
    pub fn insert(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        symbols: impl Into<Vec<u8>>,
    ) -> Result<(), ClusterError> {
        if id == 0 {
            return Err(ClusterError::InvalidInput(
                "sequence ids start at 1".to_string(),
            ));
        }
        if self.seqs.contains_key(&id) {
            return Err(ClusterError::InvalidInput(format!(
                "duplicate sequence id {}",
                id
            )));
        }

        let seq = Sequence {
            id,
            name: name.into(),
            symbols: symbols.into(),
        };
        self.seqs.insert(id, seq);
        Ok(())
    }

    /// Append a sequence under the next free id and return that id.
    pub fn push(&mut self, name: impl Into<String>, symbols: impl Into<Vec<u8>>) -> NodeId {
        let id = self.max_id().unwrap_or(0) + 1;
        self.seqs.insert(
            id,
            Sequence {
                id,
                name: name.into(),
                symbols: symbols.into(),
            },
        );
        id
    }

    /// Read all records of a FASTA file. Ids are `1..=n` in file order.
    pub fn from_fasta(infile: &str) -> anyhow::Result<Self> {
        let reader = crate::reader(infile)?;
        let mut fa_in = noodles_fasta::io::Reader::new(reader);

        let mut set = SeqSet::new();
        for result in fa_in.records() {
            let record = result?;
            let name = String::from_utf8(record.name().into())?;
            set.push(name, record.sequence().as_ref().to_vec());
        }

        Ok(set)
    }

    pub fn get(&self, id: NodeId) -> Option<&Sequence> {
        self.seqs.get(&id)
    }

    /// Ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + Clone + '_ {
        self.seqs.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.seqs.values()
    }

    pub fn max_id(&self) -> Option<NodeId> {
        self.seqs.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_set_push_ids() {
        let mut set = SeqSet::new();
        assert_eq!(set.push("a", "AAA"), 1);
        assert_eq!(set.push("b", "AAT"), 2);
        set.insert(10, "c", "TTT").unwrap();
        assert_eq!(set.push("d", "ATT"), 11);

        assert_eq!(set.ids().collect::<Vec<_>>(), vec![1, 2, 10, 11]);
        assert_eq!(set.get(10).unwrap().symbols, b"TTT".to_vec());
        assert_eq!(set.get(2).unwrap().name, "b");
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_seq_set_from_fasta() {
        let set = SeqSet::from_fasta("tests/data/four.fa").unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.ids().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(set.get(1).unwrap().name, "S1");
        assert_eq!(set.get(4).unwrap().name, "S4");
    }

    #[test]
    fn test_seq_set_id_pairs() {
        use itertools::Itertools;

        let mut set = SeqSet::new();
        set.insert(3, "a", "A").unwrap();
        set.insert(1, "b", "A").unwrap();
        set.insert(8, "c", "A").unwrap();

        let pairs: Vec<(usize, usize)> = set.ids().tuple_combinations().collect();
        assert_eq!(pairs, vec![(1, 3), (1, 8), (3, 8)]);
    }
}
