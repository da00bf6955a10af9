use std::fmt::Display;

use chrono::{DateTime, Utc};

use ndarray::{Array1, Zip};
use rusle::{
    constants::NODATAVAL,
    models::input::{Input, InputElement, InputVariableName::*},
};

use crate::common::io::readers::prelude::InputHandler;

fn replace<'a>(
    dst: &'a mut Array1<InputElement>,
    src: &Array1<f32>,
    fun: fn(&'a mut InputElement) -> &'a mut f32,
) {
    Zip::from(dst).and(src).par_for_each(|d, s| {
        let result = fun(d);
        if *result <= (NODATAVAL + 1.0) {
            *result = *s;
        }
    });
}

fn maybe_replace<'a>(
    dst: &'a mut Array1<InputElement>,
    src: &Option<Array1<f32>>,
    fun: fn(&'a mut InputElement) -> &'a mut f32,
) {
    match src {
        Some(src) => replace(dst, src, fun),
        None => (),
    }
}

/// Get the input data from the input handler and save it in the Input struct
pub fn get_input(handler: &dyn InputHandler, time: &DateTime<Utc>, len: usize) -> Input {
    let mut data: Array1<InputElement> = Array1::default(len);

    // Daily precipitation
    let rain = handler.get_values(P, time); // supposed in mm
    maybe_replace(&mut data, &rain, |i| &mut i.rain);

    Input {
        time: time.to_owned(),
        data,
    }
}

#[derive(Debug)]
pub struct RusleError {
    msg: String,
}

impl From<String> for RusleError {
    fn from(msg: String) -> Self {
        RusleError { msg }
    }
}

impl From<RusleError> for String {
    fn from(value: RusleError) -> String {
        value.msg
    }
}

impl From<&str> for RusleError {
    fn from(msg: &str) -> Self {
        RusleError { msg: msg.into() }
    }
}

impl Display for RusleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg)
    }
}
