//! hand-compiled test circuits built from scripted templates

#![allow(dead_code)]

use zeratul_witness::{
    CompiledCircuit, FieldArithmetic, Fr, InputSignal, Result, RunScope, Template, TemplateId, TemplateInfo,
};

pub type Body = fn(&RunScope<'_, '_, Fr>) -> Result<()>;

/// a template whose run body is a plain function
pub struct Scripted {
    pub info: TemplateInfo,
    pub body: Body,
}

impl Scripted {
    pub fn new(id: TemplateId, name: &'static str, input_arity: usize, subcomponents: usize, body: Body) -> Self {
        Self {
            info: TemplateInfo {
                id,
                name,
                input_arity,
                subcomponents,
            },
            body,
        }
    }
}

impl Template<Fr> for Scripted {
    fn info(&self) -> TemplateInfo {
        self.info
    }

    fn run(&self, scope: &RunScope<'_, '_, Fr>) -> Result<()> {
        (self.body)(scope)
    }
}

pub struct TestCircuit {
    pub templates: Vec<Box<dyn Template<Fr>>>,
    pub main: TemplateId,
    pub total_signals: usize,
    pub components: usize,
    pub inputs: Vec<InputSignal>,
    pub witness: Vec<usize>,
    pub constants: Vec<&'static str>,
}

impl CompiledCircuit<Fr> for TestCircuit {
    fn name(&self) -> &'static str {
        "test"
    }

    fn main_input_signal_start(&self) -> usize {
        self.inputs.first().map_or(0, |s| s.offset)
    }

    fn main_input_signal_no(&self) -> usize {
        self.inputs.iter().map(|s| s.len).sum()
    }

    fn total_signal_no(&self) -> usize {
        self.total_signals
    }

    fn number_of_components(&self) -> usize {
        self.components
    }

    fn constants(&self) -> &[&'static str] {
        &self.constants
    }

    fn witness_to_signal(&self) -> &[usize] {
        &self.witness
    }

    fn input_signals(&self) -> &[InputSignal] {
        &self.inputs
    }

    fn template(&self, id: TemplateId) -> Option<&dyn Template<Fr>> {
        self.templates.get(id).map(|t| t.as_ref())
    }

    fn main_template(&self) -> &dyn Template<Fr> {
        self.templates[self.main].as_ref()
    }
}

// --- shared templates -------------------------------------------------------
//
// every template keeps `out` at local 0 and its inputs right after it.

pub const SQUARE: TemplateId = 0;
pub const CHECKED: TemplateId = 1;
pub const CONST_SOURCE: TemplateId = 2;
pub const PRODUCT: TemplateId = 3;
pub const MAIN: TemplateId = 4;

/// signals reserved per child in [`single_input_circuit`]
pub const CHILD_STRIDE: usize = 3;

/// `out <== in * in`
pub fn square(scope: &RunScope<'_, '_, Fr>) -> Result<()> {
    let x = scope.signal(1)?;
    scope.write_signal(0, Fr::multiply(&x, &x))?;
    scope.release_subcomponents()
}

/// `assert(in != 0); out <== in`
pub fn checked(scope: &RunScope<'_, '_, Fr>) -> Result<()> {
    let x = scope.signal(1)?;
    scope.assert_true(&x, 7)?;
    scope.write_signal(0, x)?;
    scope.release_subcomponents()
}

/// `out <== in1 * in2`
pub fn product(scope: &RunScope<'_, '_, Fr>) -> Result<()> {
    let a = scope.signal(1)?;
    let b = scope.signal(2)?;
    scope.write_signal(0, Fr::multiply(&a, &b))?;
    scope.release_subcomponents()
}

/// `out <== constant 0`, no inputs
pub fn const_source(scope: &RunScope<'_, '_, Fr>) -> Result<()> {
    scope.write_signal(0, scope.constant(0)?)?;
    scope.release_subcomponents()
}

pub fn leaf_templates() -> Vec<Box<dyn Template<Fr>>> {
    vec![
        Box::new(Scripted::new(SQUARE, "Square", 1, 0, square)),
        Box::new(Scripted::new(CHECKED, "Checked", 1, 0, checked)),
        Box::new(Scripted::new(CONST_SOURCE, "ConstSource", 0, 0, const_source)),
        Box::new(Scripted::new(PRODUCT, "Product", 2, 0, product)),
    ]
}

/// circuit whose main template has one input at offset 2, `out` at offset 1,
/// `slots` child slots and room for that many children starting at offset 3
pub fn single_input_circuit(main_body: Body, slots: usize, components: usize) -> TestCircuit {
    with_main(Box::new(Scripted::new(MAIN, "Main", 1, slots, main_body)), slots, components)
}

/// same layout as [`single_input_circuit`] around an arbitrary main template
pub fn with_main(main: Box<dyn Template<Fr>>, slots: usize, components: usize) -> TestCircuit {
    let mut templates = leaf_templates();
    templates.push(main);
    TestCircuit {
        templates,
        main: MAIN,
        total_signals: 3 + CHILD_STRIDE * slots,
        components,
        inputs: vec![InputSignal {
            name: "x",
            offset: 2,
            len: 1,
        }],
        witness: vec![0, 1, 2],
        constants: vec!["42"],
    }
}

/// absolute signal start of child `i` in [`single_input_circuit`]
pub fn child_start(scope: &RunScope<'_, '_, Fr>, i: usize) -> Result<usize> {
    Ok(scope.signal_start()? + 2 + CHILD_STRIDE * i)
}
