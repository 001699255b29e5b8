//! Scripted booking confirmation.
//!
//! A [`Booking`] moves from [`Quoted`] to [`Accepted`] through
//! [`Booking::confirm`]. Nothing is dispatched: acceptance is immediate and the
//! messages are fixed.

use crate::fare::TripRecord;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::info;

pub const REQUEST_MESSAGE: &str = "Sending request to nearby porters...";
pub const ACCEPTED_MESSAGE: &str =
    "A porter has accepted your request and will meet you shortly at the platform.";

/// An estimated price for one trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub trip: TripRecord,
    pub price: u32,
}

/// Quote shown, not yet confirmed.
#[derive(Clone, Copy, Debug)]
pub struct Quoted;

/// A porter has accepted.
#[derive(Clone, Copy, Debug)]
pub struct Accepted;

#[derive(Clone, Debug)]
pub struct Booking<S> {
    quote: Quote,
    _state: PhantomData<S>,
}

impl<S> Booking<S> {
    pub fn quote(&self) -> &Quote {
        &self.quote
    }
}

impl Booking<Quoted> {
    pub fn new(quote: Quote) -> Self {
        Self {
            quote,
            _state: PhantomData,
        }
    }

    pub fn accepted(&self) -> bool {
        false
    }

    /// Sends the request and returns the accepted booking.
    pub fn confirm(self) -> Booking<Accepted> {
        info!(
            station = %self.quote.trip.station(),
            price = self.quote.price,
            "{}",
            REQUEST_MESSAGE
        );
        Booking {
            quote: self.quote,
            _state: PhantomData,
        }
    }
}

impl Booking<Accepted> {
    pub fn accepted(&self) -> bool {
        true
    }

    /// Messages in the order they are shown.
    pub fn messages(&self) -> [&'static str; 2] {
        [REQUEST_MESSAGE, ACCEPTED_MESSAGE]
    }
}

impl From<Quote> for Booking<Quoted> {
    fn from(quote: Quote) -> Self {
        Booking::new(quote)
    }
}
