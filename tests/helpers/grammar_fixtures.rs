//! Grammars used across the integration tests.

use llk::{Grammar, GrammarBuilder};

/// Build a grammar or fail the test with the builder's message.
pub fn build(builder: GrammarBuilder) -> Grammar {
    match builder.build() {
        Ok(grammar) => grammar,
        Err(error) => panic!("fixture grammar is invalid: {}", error),
    }
}

/// ```text
/// op : "+" | "-" | "*" ;
/// ```
pub fn operator_grammar() -> Grammar {
    let mut builder = GrammarBuilder::new(1);
    builder.entry_rule("op", |r| {
        for token in ["+", "-", "*"] {
            r.alt(|a| {
                a.token(token);
            });
        }
    });
    build(builder)
}

/// ```text
/// s : "a" "b" | "a" "c" ;
/// ```
pub fn common_prefix_grammar(max_k: usize) -> Grammar {
    let mut builder = GrammarBuilder::new(max_k);
    builder.entry_rule("s", |r| {
        r.alt(|a| {
            a.token("a").token("b");
        });
        r.alt(|a| {
            a.token("a").token("c");
        });
    });
    build(builder)
}

/// ```text
/// opt : "x" | ;
/// ```
pub fn epsilon_alternative_grammar(max_k: usize) -> Grammar {
    let mut builder = GrammarBuilder::new(max_k);
    builder.entry_rule("opt", |r| {
        r.alt(|a| {
            a.token("x");
        });
        r.empty_alt();
    });
    build(builder)
}

/// ```text
/// s   : opt "x" ;
/// opt : "x" | ;
/// ```
pub fn epsilon_conflict_grammar(max_k: usize) -> Grammar {
    let mut builder = GrammarBuilder::new(max_k);
    builder.entry_rule("s", |r| {
        r.alt(|a| {
            a.rule_ref("opt").token("x");
        });
    });
    builder.rule("opt", |r| {
        r.alt(|a| {
            a.token("x");
        });
        r.empty_alt();
    });
    build(builder)
}

/// ```text
/// expr   : term (("+" | "-") term)* ;
/// term   : factor (("*" | "/") factor)* ;
/// factor : INT | "(" expr ")" ;
/// ```
pub fn expression_grammar(max_k: usize) -> Grammar {
    let mut builder = GrammarBuilder::new(max_k);
    builder.entry_rule("expr", |r| {
        r.alt(|a| {
            a.rule_ref("term").zero_or_more(|b| {
                b.alt(|a| {
                    a.subrule(|b| {
                        b.alt(|a| {
                            a.token("+");
                        });
                        b.alt(|a| {
                            a.token("-");
                        });
                    })
                    .rule_ref("term");
                });
            });
        });
    });
    builder.rule("term", |r| {
        r.alt(|a| {
            a.rule_ref("factor").zero_or_more(|b| {
                b.alt(|a| {
                    a.subrule(|b| {
                        b.alt(|a| {
                            a.token("*");
                        });
                        b.alt(|a| {
                            a.token("/");
                        });
                    })
                    .rule_ref("factor");
                });
            });
        });
    });
    builder.rule("factor", |r| {
        r.alt(|a| {
            a.token("INT");
        });
        r.alt(|a| {
            a.token("(").rule_ref("expr").token(")");
        });
    });
    build(builder)
}

/// ```text
/// stmt : ID "=" expr ";" | ID "(" ")" ";" ;
/// expr : ID | INT ;
/// ```
pub fn statement_grammar(max_k: usize) -> Grammar {
    let mut builder = GrammarBuilder::new(max_k);
    builder.entry_rule("stmt", |r| {
        r.alt(|a| {
            a.token("ID").token("=").rule_ref("expr").token(";");
        });
        r.alt(|a| {
            a.token("ID").token("(").token(")").token(";");
        });
    });
    builder.rule("expr", |r| {
        r.alt(|a| {
            a.token("ID");
        });
        r.alt(|a| {
            a.token("INT");
        });
    });
    build(builder)
}

/// ```text
/// r : r ;
/// ```
pub fn bottomless_grammar(max_k: usize) -> Grammar {
    let mut builder = GrammarBuilder::new(max_k);
    builder.entry_rule("r", |r| {
        r.alt(|a| {
            a.rule_ref("r");
        });
    });
    build(builder)
}

/// ```text
/// list : list "," ID | ID ;
/// ```
pub fn left_recursive_list(max_k: usize) -> Grammar {
    let mut builder = GrammarBuilder::new(max_k);
    builder.entry_rule("list", |r| {
        r.alt(|a| {
            a.rule_ref("list").token(",").token("ID");
        });
        r.alt(|a| {
            a.token("ID");
        });
    });
    build(builder)
}
