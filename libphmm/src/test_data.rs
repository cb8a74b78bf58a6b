use crate::structs::Sequence;

pub const TRAINING_ALIGNMENT: [&str; 10] = [
    "UACAAUCAAGG",
    "UA-AAUCAAGG",
    "U--AAUCAAGG",
    "U-CAAUCAAGG",
    "U--AAUCAAGG",
    "U--AAUCAAGG",
    "UACAAUCAAGG",
    "U--AAUCAAGG",
    "U--AAUCAAGG",
    "UACAAUCAAGG",
];

pub fn training_alignment() -> Vec<Sequence> {
    TRAINING_ALIGNMENT
        .iter()
        .enumerate()
        .map(|(idx, residues)| Sequence::new(format!("train-{idx}"), None, residues.as_bytes()))
        .collect()
}

pub fn sequences(residues: &[&str]) -> Vec<Sequence> {
    residues
        .iter()
        .enumerate()
        .map(|(idx, residues)| Sequence::new(format!("seq-{idx}"), None, residues.as_bytes()))
        .collect()
}
