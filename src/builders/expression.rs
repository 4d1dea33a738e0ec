//! Builds a single-stage formula from a written rule such as
//! `0.5 × matematyka (R) + 0.3 × fizyka (R)`.
//!
//! Accepted syntax: `*`, `x` or `×` for multiplication; `/` by a number;
//! decimal commas; Polish names, short names and catalog codes for subjects;
//! `R`/`P` levels (bare or in parentheses, extended when omitted);
//! `max(a, b) R` and `(a R lub b R)` alternative groups; an optional `W =`
//! prefix. Divisors are folded into the weights and added constants become a
//! flat bonus.

use super::{FormulaBuilder, StageBuilder, DEFAULT_STAGE_ID, DEFAULT_STAGE_NAME};
use crate::error::{RekrutError, Result};
use crate::formula::{BonusKind, BonusRule, Formula, MaturaLevel, Subject};
use std::collections::HashSet;
use tracing::debug;

pub const CONSTANT_BONUS_ID: &str = "constant";

pub fn parse_expression(input: &str, university_id: &str, program_id: &str) -> Result<Formula> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.chars().count(),
    };
    let terms = parser.expression()?;
    debug!(terms = terms.len(), "parsed expression");
    build(input.trim(), &terms, university_id, program_id)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Word(String),
    Plus,
    Star,
    Slash,
    Equals,
    Comma,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let start = i;
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '*' | '×' | '·' => Token::Star,
            '/' => Token::Slash,
            '=' => Token::Equals,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() => {
                let mut text = String::new();
                while i < chars.len() && chars[i].is_ascii_digit() {
                    text.push(chars[i]);
                    i += 1;
                }
                let decimal_mark = i + 1 < chars.len()
                    && (chars[i] == '.' || chars[i] == ',')
                    && chars[i + 1].is_ascii_digit();
                if decimal_mark {
                    text.push('.');
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        text.push(chars[i]);
                        i += 1;
                    }
                }
                let value = text.parse::<f64>().map_err(|e| RekrutError::Expression {
                    position: start,
                    message: format!("invalid number '{text}': {e}"),
                })?;
                tokens.push((start, Token::Number(value)));
                continue;
            }
            c if c.is_alphabetic() => {
                let mut word = String::new();
                while i < chars.len()
                    && (chars[i].is_alphabetic() || chars[i] == '.' || chars[i] == '_')
                {
                    word.extend(chars[i].to_lowercase());
                    i += 1;
                }
                let token = if word == "x" {
                    Token::Star
                } else {
                    Token::Word(word)
                };
                tokens.push((start, token));
                continue;
            }
            other => {
                return Err(RekrutError::Expression {
                    position: start,
                    message: format!("unexpected character '{other}'"),
                })
            }
        };
        tokens.push((start, token));
        i += 1;
    }
    Ok(tokens)
}

fn level_word(word: &str) -> Option<MaturaLevel> {
    match word {
        "r" | "rozsz" | "rozszerzony" | "rozszerzenie" => Some(MaturaLevel::Extended),
        "p" | "podst" | "podstawowy" | "podstawa" => Some(MaturaLevel::Basic),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Exam(Subject, MaturaLevel),
    Best(Vec<Subject>, MaturaLevel),
}

/// `weight × target`, or a bare constant when `target` is `None`.
#[derive(Debug, Clone, PartialEq)]
struct Term {
    target: Option<Target>,
    weight: f64,
}

fn scale(terms: Vec<Term>, factor: f64) -> Vec<Term> {
    terms
        .into_iter()
        .map(|term| Term {
            weight: term.weight * factor,
            ..term
        })
        .collect()
}

fn constant_value(terms: &[Term]) -> Option<f64> {
    terms
        .iter()
        .all(|term| term.target.is_none())
        .then(|| terms.iter().map(|term| term.weight).sum())
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn expression(&mut self) -> Result<Vec<Term>> {
        if matches!(self.peek(), Some(Token::Word(word)) if word == "w")
            && matches!(self.peek_at(1), Some(Token::Equals))
        {
            self.pos += 2;
        }
        let terms = self.sum()?;
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(terms)
    }

    fn sum(&mut self) -> Result<Vec<Term>> {
        let mut terms = self.product()?;
        while self.eat(&Token::Plus) {
            terms.extend(self.product()?);
        }
        Ok(terms)
    }

    fn product(&mut self) -> Result<Vec<Term>> {
        let mut terms = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                let position = self.position();
                let right = self.unary()?;
                terms = match (constant_value(&terms), constant_value(&right)) {
                    (_, Some(factor)) => scale(terms, factor),
                    (Some(factor), None) => scale(right, factor),
                    (None, None) => {
                        return Err(RekrutError::Expression {
                            position,
                            message: "cannot multiply two subject terms".to_string(),
                        })
                    }
                };
            } else if self.eat(&Token::Slash) {
                let position = self.position();
                let divisor = self.number()?;
                if divisor == 0.0 {
                    return Err(RekrutError::Expression {
                        position,
                        message: "division by zero".to_string(),
                    });
                }
                terms = scale(terms, 1.0 / divisor);
            } else {
                return Ok(terms);
            }
        }
    }

    fn unary(&mut self) -> Result<Vec<Term>> {
        match self.peek().cloned() {
            Some(Token::Number(value)) => {
                self.pos += 1;
                Ok(vec![Term {
                    target: None,
                    weight: value,
                }])
            }
            Some(Token::LParen) if self.group_has_alternatives() => {
                self.pos += 1;
                let target = self.alternatives(&Token::RParen)?;
                Ok(vec![Term {
                    target: Some(target),
                    weight: 1.0,
                }])
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let terms = self.sum()?;
                self.expect(&Token::RParen, "expected ')'")?;
                Ok(terms)
            }
            Some(Token::Word(word)) if word == "max" => {
                self.pos += 1;
                self.expect(&Token::LParen, "expected '(' after max")?;
                let target = self.alternatives(&Token::RParen)?;
                Ok(vec![Term {
                    target: Some(target),
                    weight: 1.0,
                }])
            }
            Some(Token::Word(_)) => {
                let (subject, level) = self.subject_ref()?;
                Ok(vec![Term {
                    target: Some(Target::Exam(
                        subject,
                        level.unwrap_or(MaturaLevel::Extended),
                    )),
                    weight: 1.0,
                }])
            }
            Some(_) => Err(self.error("expected a number, subject or group")),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    /// Subjects separated by `,` or `lub` up to `close`, then an optional
    /// level shared by entries that did not state their own.
    fn alternatives(&mut self, close: &Token) -> Result<Target> {
        let mut entries = vec![self.subject_ref()?];
        loop {
            if self.eat(close) {
                break;
            }
            if !self.eat(&Token::Comma) && !self.eat_word("lub") {
                return Err(self.error("expected ',', 'lub' or ')'"));
            }
            entries.push(self.subject_ref()?);
        }
        let shared = self.level()?;

        let mut subjects = Vec::with_capacity(entries.len());
        let mut levels = HashSet::new();
        for (subject, level) in entries {
            levels.insert(level.or(shared).unwrap_or(MaturaLevel::Extended));
            if !subjects.contains(&subject) {
                subjects.push(subject);
            }
        }
        if levels.len() > 1 {
            return Err(self.error("alternatives must share one level"));
        }
        let level = levels
            .into_iter()
            .next()
            .unwrap_or(MaturaLevel::Extended);
        Ok(Target::Best(subjects, level))
    }

    fn subject_ref(&mut self) -> Result<(Subject, Option<MaturaLevel>)> {
        let position = self.position();
        let mut words = Vec::new();
        let mut level = None;
        while let Some(Token::Word(word)) = self.peek() {
            if word == "lub" || word == "max" || level_word(word).is_some() {
                break;
            }
            let word = word.clone();
            self.pos += 1;
            // shorthand such as mat_r / pol_p
            match word.split_once('_') {
                Some((name, suffix)) if level_word(suffix).is_some() => {
                    words.push(name.to_string());
                    level = level_word(suffix);
                    break;
                }
                _ => words.push(word),
            }
        }
        if words.is_empty() {
            return Err(self.error("expected a subject name"));
        }
        let name = words.join(" ");
        let subject = Subject::from_name(&name).ok_or_else(|| RekrutError::Expression {
            position,
            message: format!("unknown subject '{name}'"),
        })?;
        if level.is_none() {
            level = self.level()?;
        }
        Ok((subject, level))
    }

    /// Optional `R`, `P`, `(R)` or `(P)`.
    fn level(&mut self) -> Result<Option<MaturaLevel>> {
        if let Some(Token::Word(word)) = self.peek() {
            if let Some(level) = level_word(word) {
                self.pos += 1;
                return Ok(Some(level));
            }
        }
        let parenthesized = matches!(self.peek(), Some(Token::LParen))
            && matches!(self.peek_at(2), Some(Token::RParen));
        if parenthesized {
            if let Some(Token::Word(word)) = self.peek_at(1) {
                if let Some(level) = level_word(word) {
                    self.pos += 3;
                    return Ok(Some(level));
                }
            }
        }
        Ok(None)
    }

    fn number(&mut self) -> Result<f64> {
        match self.peek() {
            Some(Token::Number(value)) => {
                let value = *value;
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.error("expected a number")),
        }
    }

    /// Whether the parenthesized group starting here uses `lub` at its own
    /// nesting level.
    fn group_has_alternatives(&self) -> bool {
        let mut depth = 0usize;
        for (_, token) in &self.tokens[self.pos..] {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return false;
                    }
                }
                Token::Word(word) if word == "lub" && depth == 1 => return true,
                _ => {}
            }
        }
        false
    }

    fn peek(&self) -> Option<&Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|(_, token)| token)
    }

    fn eat_word(&mut self, expected: &str) -> bool {
        match self.peek() {
            Some(Token::Word(word)) if word == expected => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, message: &str) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.end, |(position, _)| *position)
    }

    fn error(&self, message: &str) -> RekrutError {
        RekrutError::Expression {
            position: self.position(),
            message: message.to_string(),
        }
    }
}

fn build(source: &str, terms: &[Term], university_id: &str, program_id: &str) -> Result<Formula> {
    if terms.iter().all(|term| term.target.is_none()) {
        return Err(RekrutError::Expression {
            position: 0,
            message: "expression contains no subjects".to_string(),
        });
    }

    let stage_max: f64 = terms
        .iter()
        .filter(|term| term.target.is_some())
        .map(|term| 100.0 * term.weight)
        .sum();
    let constant: f64 = terms
        .iter()
        .filter(|term| term.target.is_none())
        .map(|term| term.weight)
        .sum();

    let mut used_ids = HashSet::new();
    let mut groups = 0;
    let mut stage = StageBuilder::new(DEFAULT_STAGE_ID, DEFAULT_STAGE_NAME, stage_max);
    for term in terms {
        match &term.target {
            None => {}
            Some(Target::Exam(subject, level)) => {
                let code = subject.code().to_lowercase();
                let base = match level {
                    MaturaLevel::Extended => code,
                    MaturaLevel::Basic => format!("{code}_p"),
                };
                let id = unique_id(&base, &mut used_ids);
                stage = stage.exam(id, *subject, *level, term.weight);
            }
            Some(Target::Best(subjects, level)) => {
                groups += 1;
                let id = unique_id(&format!("max{groups}"), &mut used_ids);
                stage = stage.best_of(&id, subjects, *level, term.weight);
            }
        }
    }

    let mut builder = FormulaBuilder::new(university_id, program_id)
        .stage(stage)
        .description(source)
        .max_possible_score(stage_max + constant.max(0.0));
    if constant != 0.0 {
        builder = builder.bonus(
            BonusRule::new(CONSTANT_BONUS_ID, BonusKind::Other, constant)
                .with_condition("constant term of the written rule"),
        );
    }
    Ok(builder.build())
}

fn unique_id(base: &str, used: &mut HashSet<String>) -> String {
    let mut id = base.to_string();
    let mut suffix = 2;
    while !used.insert(id.clone()) {
        id = format!("{base}_{suffix}");
        suffix += 1;
    }
    id
}
