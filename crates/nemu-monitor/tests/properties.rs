use nemu_monitor::{evaluate, Config, Cpu, ErrorKind};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Bin {
    Add,
    Sub,
    Mul,
    Div,
}

impl Bin {
    fn symbol(self) -> &'static str {
        match self {
            Bin::Add => "+",
            Bin::Sub => "-",
            Bin::Mul => "*",
            Bin::Div => "/",
        }
    }
}

#[derive(Debug, Clone)]
enum Term {
    Literal { value: u32, hex: bool },
    Group(Box<Chain>),
}

/// A sequence of terms joined by operators, like `1 + (2 - 3) * 4`.
#[derive(Debug, Clone)]
struct Chain {
    first: Term,
    rest: Vec<(Bin, Term)>,
}

impl Term {
    fn render(&self, out: &mut String) {
        match self {
            Term::Literal { value, hex: true } => out.push_str(&format!("0x{:x}", value)),
            Term::Literal { value, hex: false } => out.push_str(&value.to_string()),
            Term::Group(chain) => {
                out.push('(');
                chain.render(out);
                out.push(')');
            }
        }
    }

    fn value(&self) -> Result<u32, ErrorKind> {
        match self {
            Term::Literal { value, .. } => Ok(*value),
            Term::Group(chain) => chain.value(),
        }
    }
}

impl Chain {
    fn render(&self, out: &mut String) {
        self.first.render(out);

        for (op, term) in &self.rest {
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            term.render(out);
        }
    }

    fn to_source(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }

    /// Fold the chain left to right, with `*` and `/` binding tighter than
    /// `+` and `-`.
    fn value(&self) -> Result<u32, ErrorKind> {
        let mut sum = 0u32;
        let mut pending = Bin::Add;
        let mut product = self.first.value()?;

        for (op, term) in &self.rest {
            let value = term.value()?;

            match op {
                Bin::Mul => product = product.wrapping_mul(value),
                Bin::Div => {
                    product = product
                        .checked_div(value)
                        .ok_or(ErrorKind::Arithmetic)?;
                }
                Bin::Add | Bin::Sub => {
                    sum = add(pending, sum, product);
                    pending = *op;
                    product = value;
                }
            }
        }

        Ok(add(pending, sum, product))
    }
}

fn add(op: Bin, lhs: u32, rhs: u32) -> u32 {
    match op {
        Bin::Sub => lhs.wrapping_sub(rhs),
        _ => lhs.wrapping_add(rhs),
    }
}

fn bin() -> impl Strategy<Value = Bin> {
    prop_oneof![
        Just(Bin::Add),
        Just(Bin::Sub),
        Just(Bin::Mul),
        Just(Bin::Div)
    ]
}

fn chain(term: BoxedStrategy<Term>) -> impl Strategy<Value = Chain> {
    (term.clone(), prop::collection::vec((bin(), term), 0..6))
        .prop_map(|(first, rest)| Chain { first, rest })
}

fn term() -> BoxedStrategy<Term> {
    // small values make zero divisors and exact division likely.
    let value = prop_oneof![0u32..16, any::<u32>()];
    let literal = (value, any::<bool>()).prop_map(|(value, hex)| Term::Literal { value, hex });

    literal
        .prop_recursive(4, 64, 6, |inner| {
            chain(inner).prop_map(|c| Term::Group(Box::new(c)))
        })
        .boxed()
}

fn expression() -> impl Strategy<Value = Chain> {
    chain(term())
}

fn eval(input: &str) -> Result<u32, ErrorKind> {
    evaluate(input, &Cpu::default(), &Config::default()).map_err(|e| e.kind())
}

proptest! {
    #[test]
    fn test_matches_left_to_right_arithmetic(expr in expression()) {
        let source = expr.to_source();
        prop_assert_eq!(expr.value(), eval(&source), "evaluating {}", source);
    }

    #[test]
    fn test_parenthesized_evaluates_the_same(expr in expression()) {
        let source = expr.to_source();
        prop_assert_eq!(eval(&source), eval(&format!("({})", source)), "evaluating {}", source);
    }
}
