use std::collections::BTreeSet;

use ndarray::Array2;
use serde::Serialize;

use crate::{
    codes::{CodeRegistry, DescriptionLookup, coarse_code, load_code_descriptions, load_full_codes},
    errors::{CCResult, CodechipperError},
    lookups::{CodeIndex, LookupOptions},
    types::IndexType,
    vocab::{PAD_INDEX, WordVocab, load_vocab_words_path},
};

/// Per fine code statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeStats {
    /// Occurrences in the train split.
    pub train_examples: usize,

    /// Occurrences in the test split.
    pub test_examples: usize,

    /// 1-based global frequency rank; 1 is the most frequent code.
    pub rank: usize,

    /// Present in an official reference table.
    pub billable: bool,

    /// Has a description entry.
    pub valid: bool,
}

/// The assembled, immutable lookup tables.
///
/// All per-code tables are in fine code index order.
#[derive(Debug, Clone)]
pub struct LookupBundle {
    vocab: WordVocab,
    fine: CodeIndex,
    coarse: CodeIndex,
    fine2coarse: Vec<usize>,
    desc: Array2<IndexType>,
    desc_plain: Vec<String>,
    stats: Vec<CodeStats>,
}

impl LookupBundle {
    /// The word vocabulary.
    pub fn vocab(&self) -> &WordVocab {
        &self.vocab
    }

    /// The out-of-vocabulary sentinel, computed once for the bundle's vocabulary.
    pub fn unk_index(&self) -> IndexType {
        self.vocab.unk_index()
    }

    /// The fine code index.
    pub fn fine(&self) -> &CodeIndex {
        &self.fine
    }

    /// The coarse code index.
    pub fn coarse(&self) -> &CodeIndex {
        &self.coarse
    }

    /// The number of fine labels.
    pub fn num_fine(&self) -> usize {
        self.fine.len()
    }

    /// The number of coarse labels.
    pub fn num_coarse(&self) -> usize {
        self.coarse.len()
    }

    /// The coarse index of each fine index.
    pub fn fine2coarse(&self) -> &[usize] {
        &self.fine2coarse
    }

    /// Description token indices, `[num_fine x max_desc_len]`, right-padded with 0.
    pub fn desc(&self) -> &Array2<IndexType> {
        &self.desc
    }

    /// Description text (tokens joined by spaces), per fine code.
    pub fn desc_plain(&self) -> &[String] {
        &self.desc_plain
    }

    /// Stats, per fine code.
    pub fn stats(&self) -> &[CodeStats] {
        &self.stats
    }

    /// Stats for a fine code, if present.
    pub fn stats_for(
        &self,
        code: &str,
    ) -> Option<&CodeStats> {
        self.fine.index_of(code).map(|idx| &self.stats[idx])
    }

    /// The coarse index of a label, via its coarse prefix.
    pub fn coarse_index_of(
        &self,
        label: &str,
    ) -> Option<usize> {
        self.coarse.index_of(coarse_code(label))
    }
}

/// Pad variable-length sequences with [`PAD_INDEX`] into a matrix.
///
/// Pass one finds the longest row; pass two copies each row into a zeroed matrix.
pub fn pad_sequences<S: AsRef<[IndexType]>>(rows: &[S]) -> Array2<IndexType> {
    let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);

    let mut padded = Array2::from_elem((rows.len(), width), PAD_INDEX);
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.as_ref().iter().enumerate() {
            padded[[i, j]] = value;
        }
    }
    padded
}

/// Assemble a [`LookupBundle`] from its parts.
///
/// ## Arguments
/// * `registry` - the codes seen in the labeled splits.
/// * `descriptions` - the code descriptions.
/// * `base_words` - the base vocabulary word list.
/// * `options` - the assembly flags.
pub fn assemble_lookups(
    registry: &CodeRegistry,
    descriptions: &DescriptionLookup,
    base_words: BTreeSet<String>,
    options: &LookupOptions,
) -> CCResult<LookupBundle> {
    let mut codes: BTreeSet<String> = registry
        .codes()
        .iter()
        .filter(|code| options.include_invalid || descriptions.contains(code))
        .cloned()
        .collect();

    let coarse_codes: BTreeSet<String> = codes
        .iter()
        .filter(|code| !code.is_empty())
        .map(|code| coarse_code(code).to_string())
        .collect();

    if options.hierarchical {
        codes.retain(|code| !coarse_codes.contains(code));
    }

    let fine = CodeIndex::from_codes(codes);
    let coarse = CodeIndex::from_codes(coarse_codes);

    let fine2coarse = fine
        .iter()
        .map(|(_, code)| {
            coarse.index_of(coarse_code(code)).ok_or_else(|| {
                CodechipperError::Invariant(format!("no coarse code for fine code {code:?}"))
            })
        })
        .collect::<CCResult<Vec<_>>>()?;

    let stats = fine
        .iter()
        .map(|(_, code)| -> CCResult<CodeStats> {
            let valid = descriptions.contains(code);
            let rank = registry.rank(code).ok_or_else(|| {
                CodechipperError::Invariant(format!("no rank for code {code:?}"))
            })?;
            Ok(CodeStats {
                train_examples: registry.train_examples(code),
                test_examples: registry.test_examples(code),
                rank,
                billable: valid && descriptions.is_billable(code),
                valid,
            })
        })
        .collect::<CCResult<Vec<_>>>()?;

    let code_descs: Vec<&[String]> = fine
        .iter()
        .map(|(_, code)| descriptions.tokens_for(code))
        .collect();

    let vocab = WordVocab::with_descriptions(
        base_words,
        options.embed_desc.then(|| code_descs.iter().copied()),
    );

    let desc = pad_sequences(
        &code_descs
            .iter()
            .map(|&words| vocab.encode(words))
            .collect::<Vec<_>>(),
    );
    let desc_plain = code_descs.iter().map(|words| words.join(" ")).collect();

    log::info!(
        "lookups: {} fine codes, {} coarse codes, {} words",
        fine.len(),
        coarse.len(),
        vocab.len()
    );

    Ok(LookupBundle {
        vocab,
        fine,
        coarse,
        fine2coarse,
        desc,
        desc_plain,
        stats,
    })
}

/// Build the [`LookupBundle`] described by the options.
///
/// Reads the labeled splits, the description tables, and the base word list;
/// any missing or malformed input aborts the build.
pub fn load_lookups(options: &LookupOptions) -> CCResult<LookupBundle> {
    let registry = load_full_codes(&options.data_path)?;
    let descriptions = load_code_descriptions(&options.data_dir, options.exclude_non_billable)?;
    let base_words = load_vocab_words_path(&options.vocab_path)?;

    assemble_lookups(&registry, &descriptions, base_words, options)
}
