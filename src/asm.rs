//! Two-phase assembly. The scan phase strips comments, collects labels,
//! expands `DC` data rows, and books the simulated byte footprint of each
//! row once an `ORG` sets the origin. The link phase rewrites branch and
//! jump targets into relative displacements and substitutes `EQU` constants
//! into immediates.
//!
//! Rows map 1:1 onto instruction cells: the row at index `i` lives at
//! pc `i * 4`, and a branch to row `j` is the displacement `(j - i) * 4`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::memory::Memory;
use crate::parse::{self, parse_literal, parse_mnemonic};
use crate::symbol::{Exception, FxMap, LabelValue};

lazy_static! {
    static ref ORG: Regex = Regex::new(r"^org\s+(?:0x|\$)([0-9a-f]+)").unwrap();
    static ref EQU: Regex = Regex::new(r"^([a-z_][a-z0-9_]*):\s+equ\s+([0-9]+)$").unwrap();
    static ref DC: Regex =
        Regex::new(r#"^[a-z_][a-z0-9_]*:\s+dc\.[wbl]\s+("[a-z0-9 ]+"|(?:-?[0-9]+,\s*)*-?[0-9]+)$"#)
            .unwrap();
    static ref LABELLED: Regex = Regex::new(r"^([a-z_][a-z0-9_]*):\s+(.+)$").unwrap();
    static ref IMMEDIATE_LABEL: Regex = Regex::new(r"(#[$%]?)([a-z_][a-z0-9_]*)").unwrap();
}

/// One instruction cell. Resolved rows (labels, directives, expanded data)
/// are skipped by the execution engine.
#[derive(Clone, Debug)]
pub struct Row {
    pub text: String,
    pub line: usize,
    pub resolved: bool,
}

/// The output of assembly. A fatal exception leaves the rest of the fields
/// in whatever state the failing phase reached; the engine refuses to run.
#[derive(Debug, Default)]
pub struct Program {
    pub rows: Vec<Row>,
    pub source: Vec<String>,
    pub labels: FxMap<String, LabelValue>,
    pub memory: Memory,
    pub exception: Option<Exception>,
}

pub fn assemble(text: &str) -> Program {
    let mut program = scan(text);
    if program.exception.is_none() {
        link(&mut program);
    }
    program
}

fn scan(text: &str) -> Program {
    let mut program = Program::default();
    program.source = text.lines().map(|line| line.trim().to_string()).collect();

    let mut org_offset: Option<u32> = None;
    let mut end_seen = false;

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let mut text = raw;
        if let Some(star) = text.find('*') {
            text = &text[..star];
        }
        if let Some(semi) = text.find(';') {
            text = &text[..semi];
        }
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            continue;
        }

        // Everything after END is dropped, except that a second END is
        // fatal in its own right.
        if end_seen {
            if text == "end" {
                program.exception = Some(Exception::DuplicateEnd { line });
                return program;
            }
            continue;
        }

        if let Some(caps) = ORG.captures(&text) {
            if let Ok(origin) = u32::from_str_radix(&caps[1], 16) {
                org_offset = Some(origin);
            }
            mark(&mut program.memory, &mut org_offset, 2, line);
            program.rows.push(Row { text, line, resolved: true });
            continue;
        }

        if text == "end" {
            mark(&mut program.memory, &mut org_offset, 2, line);
            program.rows.push(Row { text, line, resolved: true });
            end_seen = true;
            continue;
        }

        if let Some(label) = text.strip_suffix(':') {
            if program
                .labels
                .insert(label.to_string(), LabelValue::Index(program.rows.len()))
                .is_some()
            {
                program.exception =
                    Some(Exception::DuplicateLabel { name: label.to_string(), line });
                return program;
            }
            program.rows.push(Row { text, line, resolved: true });
            continue;
        }

        if let Some(caps) = EQU.captures(&text) {
            let label = caps[1].to_string();
            let value = caps[2].parse::<i64>().unwrap_or(0);
            if program.labels.insert(label.clone(), LabelValue::Const(value)).is_some() {
                program.exception = Some(Exception::DuplicateLabel { name: label, line });
                return program;
            }
            program.rows.push(Row { text, line, resolved: true });
            continue;
        }

        if DC.is_match(&text) {
            if let Some(exc) = expand_dc(&text, line, &mut program, &mut org_offset) {
                program.exception = Some(exc);
                return program;
            }
            continue;
        }

        // A label sharing its line with an instruction splits into a label
        // row and an instruction row, like the bare-label form. EQU and DC
        // were matched above, so anything left after the colon is code.
        if let Some(caps) = LABELLED.captures(&text) {
            let label = caps[1].to_string();
            let rest = caps[2].trim().to_string();
            if program
                .labels
                .insert(label.clone(), LabelValue::Index(program.rows.len()))
                .is_some()
            {
                program.exception = Some(Exception::DuplicateLabel { name: label, line });
                return program;
            }
            program.rows.push(Row { text: format!("{label}:"), line, resolved: true });
            mark(&mut program.memory, &mut org_offset, encoded_size(&rest), line);
            program.rows.push(Row { text: rest, line, resolved: false });
            continue;
        }

        mark(&mut program.memory, &mut org_offset, encoded_size(&text), line);
        program.rows.push(Row { text, line, resolved: false });
    }

    if !end_seen {
        program.exception = Some(Exception::MissingEnd);
    }
    program
}

/// `label: dc.x ...` becomes a label row followed by one resolved row per
/// data element (per character for strings), each holding the truncated
/// value as decimal text.
fn expand_dc(
    text: &str,
    line: usize,
    program: &mut Program,
    org_offset: &mut Option<u32>,
) -> Option<Exception> {
    let colon = text.find(':')?;
    let label = text[..colon].to_string();
    let body = text[colon + 1..].trim();
    let (_, size, _) = parse_mnemonic(body.split_whitespace().next().unwrap_or(""));

    if program
        .labels
        .insert(label.clone(), LabelValue::Index(program.rows.len()))
        .is_some()
    {
        return Some(Exception::DuplicateLabel { name: label, line });
    }
    program.rows.push(Row { text: format!("{label}:"), line, resolved: true });

    if let (Some(open), Some(close)) = (body.find('"'), body.rfind('"')) {
        let content = &body[open + 1..close];
        let count = content.chars().count() as u32;
        for ch in content.chars() {
            program.rows.push(Row { text: (ch as u32).to_string(), line, resolved: true });
        }
        mark(&mut program.memory, org_offset, 2 + count * size.bytes(), line);
        return None;
    }

    let list = body.split_whitespace().skip(1).collect::<String>();
    let count = list.split(',').count() as u32;
    for element in list.split(',') {
        let value = element.trim().parse::<i64>().unwrap_or(0);
        let truncated = size.signed(value as u32);
        program.rows.push(Row { text: truncated.to_string(), line, resolved: true });
    }
    mark(&mut program.memory, org_offset, 2 + count * size.bytes(), line);
    None
}

/// Writes `bytes` line-marker bytes at the running origin, if one is set.
/// Markers past the top of the address space are dropped.
fn mark(memory: &mut Memory, org_offset: &mut Option<u32>, bytes: u32, line: usize) {
    if let Some(offset) = org_offset {
        for _ in 0..bytes {
            if !Memory::is_valid_address(i64::from(*offset)) {
                break;
            }
            memory.set_byte(*offset, line as u32);
            *offset = offset.saturating_add(1);
        }
    }
}

/// Simulated encoded size of an instruction, used only for the memory
/// footprint bookkeeping. Most opcodes take one word; the immediate forms
/// append their sized immediate; branches grow with the displacement. A
/// branch still carrying a label name is booked at the widest form.
pub fn encoded_size(text: &str) -> u32 {
    let head = text.split_whitespace().next().unwrap_or(text);
    let (mnemonic, size, _) = parse_mnemonic(head);
    match mnemonic {
        "addi" | "subi" | "movea" | "andi" | "ori" | "eori" | "cmpi" => 2 + size.bytes(),
        m if parse::is_branch(m) => {
            let operand = text.split_whitespace().last().unwrap_or("");
            match parse_literal(operand) {
                Some(disp) if disp.unsigned_abs() <= 0xFF => 2,
                Some(disp) if disp.unsigned_abs() <= 0xFFFF => 4,
                _ => 6,
            }
        }
        _ => 2,
    }
}

/// The link phase. Branch and jump labels become relative displacements;
/// `#name` immediates pick up `EQU` constants. Unknown names are fatal.
fn link(program: &mut Program) {
    for index in 0..program.rows.len() {
        if program.rows[index].resolved {
            continue;
        }
        let text = program.rows[index].text.clone();
        let line = program.rows[index].line;
        let Some((head, tail)) = text.split_once(' ') else {
            continue;
        };
        let (mnemonic, _, _) = parse_mnemonic(head);

        if parse::is_branch(mnemonic) || parse::is_jump(mnemonic) {
            let mut operands: Vec<String> =
                tail.split(',').map(|op| op.trim().to_string()).collect();
            let target = operands.last().cloned().unwrap_or_default();
            match program.labels.get(&target) {
                Some(LabelValue::Index(to)) => {
                    let displacement = (*to as i64 - index as i64) * 4;
                    *operands.last_mut().unwrap() = displacement.to_string();
                }
                Some(LabelValue::Const(value)) => {
                    let displacement = (value - index as i64) * 4;
                    *operands.last_mut().unwrap() = displacement.to_string();
                }
                None => {
                    if parse_literal(&target).is_none() {
                        program.exception =
                            Some(Exception::UnknownLabel { name: target, line });
                        return;
                    }
                }
            }
            program.rows[index].text = format!("{head} {}", operands.join(","));
            continue;
        }

        match substitute_constants(&text, &program.labels) {
            Ok(Some(rewritten)) => program.rows[index].text = rewritten,
            Ok(None) => {}
            Err(name) => {
                program.exception = Some(Exception::UnknownLabel { name, line });
                return;
            }
        }
    }
}

/// Replaces `#name` (and `#$name`, `#%name`) with the bound value as a
/// plain decimal immediate. A name behind a radix prefix that already
/// reads as digits of that radix is left for the operand parser.
fn substitute_constants(
    text: &str,
    labels: &FxMap<String, LabelValue>,
) -> Result<Option<String>, String> {
    let mut out = String::new();
    let mut cursor = 0;
    let mut changed = false;

    for caps in IMMEDIATE_LABEL.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let prefix = &caps[1];
        let name = &caps[2];
        // A radix prefix claims the name for the operand parser; a plain
        // `#` always means a label lookup.
        let is_literal = match prefix {
            "#$" => i64::from_str_radix(name, 16).is_ok(),
            "#%" => i64::from_str_radix(name, 2).is_ok(),
            _ => false,
        };
        if is_literal {
            continue;
        }
        let value = match labels.get(name) {
            Some(LabelValue::Const(value)) => *value,
            Some(LabelValue::Index(index)) => *index as i64,
            None => return Err(name.to_string()),
        };
        // The substituted value is decimal, so the radix marker is dropped.
        out.push_str(&text[cursor..whole.start()]);
        out.push('#');
        out.push_str(&value.to_string());
        cursor = whole.end();
        changed = true;
    }

    if !changed {
        return Ok(None);
    }
    out.push_str(&text[cursor..]);
    Ok(Some(out))
}
