use super::{PerformanceIssue, PerformanceKind, SecurityIssue, SecurityKind, Severity};
use regex::Regex;
use std::sync::LazyLock;

static SQL_INTERPOLATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:SELECT|INSERT|UPDATE|DELETE)\b[^\n]*?(?:\$\{|["'`]\s*\+|\{[A-Za-z_]\w*\})"#)
        .expect("sql interpolation pattern")
});

static SQL_PARAMETERIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)parameteri[sz]ed|prepare|\.bind\(|[=(,]\s*\?").expect("sql parameter pattern")
});

static DOM_WRITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:innerHTML|outerHTML|insertAdjacentHTML)\b|document\.write")
        .expect("dom write pattern")
});

static INDEXED_LOOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"for\s*\(\s*(?:let|var)\s+\w+\s*=\s*0\s*;\s*\w+\s*<\s*[\w.]+\.length\s*;\s*\w+\s*\+\+\s*\)",
    )
    .expect("indexed loop pattern")
});

static VAR_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bvar\s").expect("var pattern"));

/// What a rule contributes to a [`super::CodeAnalysis`].
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    Security(SecurityIssue),
    Performance(PerformanceIssue),
    Practice(&'static str),
}

/// A single heuristic: a matcher returning the byte offset of the text that
/// triggered it, and the finding it produces for the 1-based line there.
pub struct Rule {
    pub id: &'static str,
    matches: fn(&str) -> Option<usize>,
    finding: fn(Option<u32>) -> Finding,
}

impl Rule {
    pub fn evaluate(&self, code: &str) -> Option<Finding> {
        let offset = (self.matches)(code)?;
        Some((self.finding)(Some(line_of(code, offset))))
    }
}

/// Evaluation order here is the order findings appear in.
pub static RULES: [Rule; 6] = [
    Rule {
        id: "sql-injection",
        matches: sql_injection,
        finding: |line| {
            Finding::Security(SecurityIssue {
                kind: SecurityKind::SqlInjection,
                severity: Severity::High,
                description: "Potential SQL injection vulnerability detected".to_string(),
                remediation: "Use parameterized queries or prepared statements".to_string(),
                line,
            })
        },
    },
    Rule {
        id: "xss",
        matches: |code| DOM_WRITE.find(code).map(|m| m.start()),
        finding: |line| {
            Finding::Security(SecurityIssue {
                kind: SecurityKind::Xss,
                severity: Severity::Medium,
                description: "Potential XSS vulnerability detected".to_string(),
                remediation: "Use textContent or proper sanitization".to_string(),
                line,
            })
        },
    },
    Rule {
        id: "legacy-loop",
        matches: |code| INDEXED_LOOP.find(code).map(|m| m.start()),
        finding: |line| {
            Finding::Performance(PerformanceIssue {
                kind: PerformanceKind::Algorithm,
                severity: Severity::Low,
                description: "Consider using forEach or for...of for better readability"
                    .to_string(),
                remediation: "Use array.forEach() or for...of loop".to_string(),
                line,
            })
        },
    },
    Rule {
        id: "timer-leak",
        matches: |code| {
            code.find("setTimeout")?;
            code.find("setInterval")
        },
        finding: |line| {
            Finding::Performance(PerformanceIssue {
                kind: PerformanceKind::Memory,
                severity: Severity::Medium,
                description: "Potential memory leak with timers".to_string(),
                remediation: "Clear timers when component unmounts".to_string(),
                line,
            })
        },
    },
    Rule {
        id: "var-declaration",
        matches: |code| VAR_DECLARATION.find(code).map(|m| m.start()),
        finding: |_| Finding::Practice("Use const or let instead of var"),
    },
    Rule {
        id: "loose-equality",
        matches: loose_equality,
        finding: |_| {
            Finding::Practice("Use strict equality (===) instead of loose equality (==)")
        },
    },
];

fn sql_injection(code: &str) -> Option<usize> {
    if SQL_PARAMETERIZED.is_match(code) {
        return None;
    }
    SQL_INTERPOLATION.find(code).map(|m| m.start())
}

/// First `==` that is neither part of `===` nor of `!=` / `!==`.
fn loose_equality(code: &str) -> Option<usize> {
    let bytes = code.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'=' && bytes[i + 1] == b'=' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'=' {
                i += 1;
            }
            let run = i - run_start;
            let negated = run_start > 0 && bytes[run_start - 1] == b'!';
            if run == 2 && !negated {
                return Some(run_start);
            }
            continue;
        }
        i += 1;
    }
    None
}

fn line_of(code: &str, offset: usize) -> u32 {
    code[..offset].matches('\n').count() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str) -> &'static Rule {
        RULES.iter().find(|r| r.id == id).unwrap()
    }

    #[test]
    fn sql_rule_needs_keyword_and_interpolation_on_one_line() {
        let sql = rule("sql-injection");
        assert!(sql.evaluate("db.query(`SELECT * FROM users WHERE id = ${id}`)").is_some());
        assert!(sql.evaluate("q = \"DELETE FROM t WHERE id = \" + id").is_some());
        assert!(sql.evaluate("const a = `${id}`;\nconst q = 'SELECT 1';").is_none());
        assert!(
            sql.evaluate("// parameterized\ndb.query(`SELECT * FROM t WHERE id = ${id}`)")
                .is_none()
        );
    }

    #[test]
    fn question_mark_placeholders_suppress_the_sql_rule() {
        let sql = rule("sql-injection");
        let bound = "db.query(\"SELECT * FROM t WHERE a = ? AND b = \" + b, [a]);";
        assert!(sql.evaluate(bound).is_none());
        assert!(sql.evaluate("db.run(\"INSERT INTO t VALUES (?, ?)\" + tail, row);").is_none());
        let ternary = "const q = \"SELECT * FROM t WHERE id = \" + (ok ? id : 0);";
        assert!(sql.evaluate(ternary).is_some());
    }

    #[test]
    fn findings_carry_the_matching_line() {
        let code = "const el = document.body;\n\nel.innerHTML = input;";
        match rule("xss").evaluate(code) {
            Some(Finding::Security(issue)) => assert_eq!(issue.line, Some(3)),
            other => panic!("unexpected finding: {:?}", other),
        }
    }

    #[test]
    fn indexed_loop_matches_any_array_name() {
        let code = "for (let j = 0; j < items.length; j++) { total += items[j]; }";
        assert!(rule("legacy-loop").evaluate(code).is_some());
        assert!(rule("legacy-loop").evaluate("for (const item of items) {}").is_none());
    }

    #[test]
    fn timers_flag_only_in_combination() {
        let timer = rule("timer-leak");
        assert!(timer.evaluate("setTimeout(run, 10);").is_none());
        assert!(timer.evaluate("setInterval(run, 10);").is_none());
        assert!(timer.evaluate("setTimeout(a, 1);\nsetInterval(b, 2);").is_some());
    }

    #[test]
    fn loose_equality_ignores_strict_and_negated_forms() {
        assert_eq!(loose_equality("a === b"), None);
        assert_eq!(loose_equality("a !== b"), None);
        assert_eq!(loose_equality("a != b"), None);
        assert_eq!(loose_equality("a === b && c == d"), Some(13));
    }

    #[test]
    fn var_requires_a_declaration() {
        assert!(rule("var-declaration").evaluate("var x = 1").is_some());
        assert!(rule("var-declaration").evaluate("let variance = 2").is_none());
    }
}
