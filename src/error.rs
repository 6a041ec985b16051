use miette::{miette, LabeledSpan, Report, Severity};

use crate::symbol::{Exception, RuntimeError};

/// Byte span of a 1-based source line, used to label diagnostics.
fn line_span(source: &str, line: usize) -> (usize, usize) {
    let mut offset = 0;
    for (index, text) in source.lines().enumerate() {
        if index + 1 == line {
            return (offset, text.len().max(1));
        }
        offset += text.len() + 1;
    }
    (0, source.len().min(1))
}

// Fatal exceptions

pub fn asm_duplicate_label(name: &str, line: usize, source: &str) -> Report {
    let (offset, len) = line_span(source, line);
    miette!(
        severity = Severity::Error,
        code = "asm::duplicate_label",
        help = "labels and EQU constants may only be defined once per program",
        labels = vec![LabeledSpan::at(offset..offset + len, "redefined here")],
        "Duplicate label '{name}'",
    )
    .with_source_code(source.to_string())
}

pub fn asm_unknown_label(name: &str, line: usize, source: &str) -> Report {
    let (offset, len) = line_span(source, line);
    miette!(
        severity = Severity::Error,
        code = "asm::unknown_label",
        help = "branch targets and #constants must name a label or EQU defined in this file",
        labels = vec![LabeledSpan::at(offset..offset + len, "unresolved name")],
        "Unknown label '{name}'",
    )
    .with_source_code(source.to_string())
}

pub fn asm_missing_end(source: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::missing_end",
        help = "every program must close with an END directive",
        labels = vec![LabeledSpan::at_offset(
            source.len().saturating_sub(1),
            "program ends here"
        )],
        "END directive missing",
    )
    .with_source_code(source.to_string())
}

pub fn asm_duplicate_end(line: usize, source: &str) -> Report {
    let (offset, len) = line_span(source, line);
    miette!(
        severity = Severity::Error,
        code = "asm::duplicate_end",
        help = "only one END directive is allowed",
        labels = vec![LabeledSpan::at(offset..offset + len, "second END")],
        "Duplicate END directive",
    )
    .with_source_code(source.to_string())
}

pub fn run_divide_by_zero(line: usize, source: &str) -> Report {
    let (offset, len) = line_span(source, line);
    miette!(
        severity = Severity::Error,
        code = "run::divide_by_zero",
        help = "the low word of the divisor operand evaluated to zero",
        labels = vec![LabeledSpan::at(offset..offset + len, "division halted execution")],
        "Attempted a divide by zero",
    )
    .with_source_code(source.to_string())
}

pub fn run_invalid_pc(pc: i64, source: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::invalid_pc",
        help = "the program counter must stay positive and 4-byte aligned; \
                check jump and branch displacements",
        "Invalid program counter {pc}",
    )
    .with_source_code(source.to_string())
}

/// Routes a halt condition to its report.
pub fn exception_report(exception: &Exception, source: &str) -> Report {
    match exception {
        Exception::InvalidPc(pc) => run_invalid_pc(*pc, source),
        Exception::DivisionByZero { line } => run_divide_by_zero(*line, source),
        Exception::DuplicateLabel { name, line } => asm_duplicate_label(name, *line, source),
        Exception::UnknownLabel { name, line } => asm_unknown_label(name, *line, source),
        Exception::MissingEnd => asm_missing_end(source),
        Exception::DuplicateEnd { line } => asm_duplicate_end(*line, source),
    }
}

// Non-fatal runtime errors

pub fn runtime_error_report(error: &RuntimeError, source: &str) -> Report {
    let (offset, len) = line_span(source, error.line);
    miette!(
        severity = Severity::Warning,
        code = "run::instruction",
        help = "the instruction was skipped and execution continued",
        labels = vec![LabeledSpan::at(offset..offset + len, format!("{}", error.kind))],
        "{error}",
    )
    .with_source_code(source.to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::ErrorKind;

    #[test]
    fn spans_cover_the_named_line() {
        let source = "first\nsecond\nthird\n";
        assert_eq!(line_span(source, 1), (0, 5));
        assert_eq!(line_span(source, 2), (6, 6));
        assert_eq!(line_span(source, 3), (13, 5));
        // Out-of-range lines fall back to the file start.
        assert_eq!(line_span(source, 9), (0, 1));
    }

    #[test]
    fn reports_render_their_message() {
        let source = "divu #0,d0\nend\n";
        let report = exception_report(&Exception::DivisionByZero { line: 1 }, source);
        assert!(report.to_string().contains("divide by zero"));

        let error = RuntimeError { kind: ErrorKind::MemoryToMemory, line: 1 };
        let report = runtime_error_report(&error, source);
        assert!(report.to_string().contains("line: 1"));
    }
}
