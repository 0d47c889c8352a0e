// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use core::cell::{Cell, RefCell};
use std::rc::Rc;

/// A [Parameter] that remembers everything done to it.
#[derive(Debug)]
pub struct TestParameter {
    name: String,
    value: Cell<ParamValue>,
    default_value: ParamValue,
    is_touched: Cell<bool>,
    touch_history: RefCell<Vec<bool>>,
    is_indicated: Cell<bool>,
    indication_calls: Cell<usize>,
    set_value_calls: Cell<usize>,
}
impl TestParameter {
    #[allow(missing_docs)]
    pub fn new_with(name: &str, default_value: ParamValue) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            value: Cell::new(default_value),
            default_value,
            is_touched: Default::default(),
            touch_history: Default::default(),
            is_indicated: Default::default(),
            indication_calls: Default::default(),
            set_value_calls: Default::default(),
        })
    }

    #[allow(missing_docs)]
    pub fn is_touched(&self) -> bool {
        self.is_touched.get()
    }

    /// Every touch (true) and release (false), in order.
    pub fn touch_history(&self) -> Vec<bool> {
        self.touch_history.borrow().clone()
    }

    #[allow(missing_docs)]
    pub fn is_indicated(&self) -> bool {
        self.is_indicated.get()
    }

    /// How many times [Parameter::set_indication()] was called, whether or
    /// not the value changed.
    pub fn indication_calls(&self) -> usize {
        self.indication_calls.get()
    }

    #[allow(missing_docs)]
    pub fn set_value_calls(&self) -> usize {
        self.set_value_calls.get()
    }
}
impl Parameter for TestParameter {
    fn exists(&self) -> bool {
        true
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn value(&self) -> ParamValue {
        self.value.get()
    }

    fn display_value(&self) -> String {
        format!("{:.0}%", self.value.get().0 * 100.0)
    }

    fn set_value(&self, value: ParamValue) {
        self.set_value_calls.set(self.set_value_calls.get() + 1);
        self.value.set(value.clamped());
    }

    fn reset(&self) {
        self.set_value(self.default_value);
    }

    fn touch(&self, is_touched: bool) {
        self.is_touched.set(is_touched);
        self.touch_history.borrow_mut().push(is_touched);
    }

    fn set_indication(&self, enable: bool) {
        self.indication_calls.set(self.indication_calls.get() + 1);
        self.is_indicated.set(enable);
    }
}
