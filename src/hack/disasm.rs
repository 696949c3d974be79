//! Disassembler for Hack programs.
//!
//! Converts instruction words back to Hack assembly mnemonics.

use crate::cpu::decode::Instruction;
use crate::logic::Word;

/// Mnemonic for a `comp` field when the y operand is A.
fn comp_mnemonic(comp: u8) -> Option<&'static str> {
    let text = match comp {
        0b101010 => "0",
        0b111111 => "1",
        0b111010 => "-1",
        0b001100 => "D",
        0b110000 => "A",
        0b001101 => "!D",
        0b110001 => "!A",
        0b001111 => "-D",
        0b110011 => "-A",
        0b011111 => "D+1",
        0b110111 => "A+1",
        0b001110 => "D-1",
        0b110010 => "A-1",
        0b000010 => "D+A",
        0b010011 => "D-A",
        0b000111 => "A-D",
        0b000000 => "D&A",
        0b010101 => "D|A",
        _ => return None,
    };
    Some(text)
}

/// Disassemble a single instruction word.
pub fn disassemble_instruction(word: Word) -> String {
    match Instruction::decode(word) {
        Instruction::Address(value) => format!("@{}", value),
        Instruction::Compute { a, comp, dest, jump } => {
            let comp_text = match comp_mnemonic(comp) {
                Some(text) if a => text.replace('A', "M"),
                Some(text) => text.to_string(),
                None => format!("comp?{:06b}", comp),
            };

            let mut out = String::new();
            let dest_text = dest.mnemonic();
            if !dest_text.is_empty() {
                out.push_str(&dest_text);
                out.push('=');
            }
            out.push_str(&comp_text);
            if !jump.mnemonic().is_empty() {
                out.push(';');
                out.push_str(jump.mnemonic());
            }
            out
        }
    }
}

/// Disassemble a program, one line per word: address, mnemonic, binary.
pub fn disassemble(words: &[Word]) -> String {
    let mut output = String::new();
    for (addr, word) in words.iter().enumerate() {
        output.push_str(&format!(
            "{:05}: {:<16} // {}\n",
            addr,
            disassemble_instruction(*word),
            word
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dis(bits: &str) -> String {
        disassemble_instruction(Word::parse(bits).unwrap())
    }

    #[test]
    fn test_address() {
        assert_eq!(dis("0000000000001010"), "@10");
        assert_eq!(dis("0111111111111111"), "@32767");
    }

    #[test]
    fn test_compute() {
        assert_eq!(dis("1111110000010000"), "D=M");
        assert_eq!(dis("1111010011010000"), "D=D-M");
        assert_eq!(dis("1110001100000001"), "D;JGT");
        assert_eq!(dis("1110101010000111"), "0;JMP");
        assert_eq!(dis("1110001100001000"), "M=D");
        assert_eq!(dis("1111110111111000"), "AMD=M+1");
    }

    #[test]
    fn test_unknown_comp() {
        assert_eq!(dis("1110111100000000"), "comp?111100");
    }

    #[test]
    fn test_listing() {
        let words = [Word::from_u16(2), Word::parse("1110101010000111").unwrap()];
        let listing = disassemble(&words);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00000: @2"));
        assert!(lines[1].contains("0;JMP"));
        assert!(lines[1].ends_with("1110101010000111"));
    }
}
