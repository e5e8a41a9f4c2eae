//! Perpetual card shuffle.
//!
//! A deck of [`CARD_COUNT`] cards is dealt one card at a time between two stacks.
//! When the source stack runs dry the stacks swap roles and the direction flips, so
//! the deal oscillates forever once started.

use std::collections::VecDeque;

use glam::{Affine2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::anim::{Easing, TaskId, Timeline, Tween};
use crate::assets::SpriteId;
use crate::canvas::{Canvas, Color, Rect, TextStyle};
use crate::config::{CARD_COUNT, SHUFFLE_PORTRAIT_OFFSET};
use crate::orientation::Orientation;
use crate::scene::{Creation, Scene, SceneContext};

/// Sheet alias holding the card faces.
const CARDS_ALIAS: &str = "cards";

const STACK_LEFT_X: f32 = 540.0;
const STACK_RIGHT_X: f32 = 740.0;
const STACK_TOP: f32 = 230.0;
const STACK_STEP: f32 = 2.0;

const MOVE_SECS: f32 = 2.0;
const DEAL_DELAY_SECS: f32 = 1.0;

const PROMPT: &str = "Click to shuffle!";
const PROMPT_POS: Vec2 = Vec2::new(640.0, 654.5);
const PROMPT_HIT: Vec2 = Vec2::new(260.0, 44.0);

/// Tile `0..faces` until `count` entries exist, permute uniformly, truncate to `count`.
pub fn build_deck(faces: usize, count: usize, rng: &mut impl Rng) -> Vec<usize> {
    if faces == 0 {
        return Vec::new();
    }
    let mut deck = Vec::with_capacity(count + faces);
    while deck.len() < count {
        deck.extend(0..faces);
    }
    fisher_yates(&mut deck, rng);
    deck.truncate(count);
    deck
}

/// In-place Fisher-Yates; every ordering is equally likely.
fn fisher_yates<T>(items: &mut [T], rng: &mut impl Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Where the `index`-th card of a stack rests.
fn stack_position(x: f32, index: usize) -> Vec2 {
    Vec2::new(x, STACK_TOP + index as f32 * STACK_STEP)
}

/// A card that has left `pending` and not yet landed in `completed`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InFlight {
    pub card: usize,
    pub target: Vec2,
}

/// The two-queue relay. Cards are indices into the scene's card arrays.
#[derive(Debug, Default)]
pub struct Deck {
    pending: VecDeque<usize>,
    completed: VecDeque<usize>,
    moving_right: bool,
    in_flight: Option<InFlight>,
    total: usize,
}

impl Deck {
    /// Every card pending, the first move heading right.
    pub fn new(total: usize) -> Self {
        Self {
            pending: (0..total).collect(),
            completed: VecDeque::new(),
            moving_right: true,
            in_flight: None,
            total,
        }
    }

    /// Take the next card off `pending` and work out where it lands.
    ///
    /// Refills `pending` from `completed` (flipping direction) when empty. Returns
    /// `None` if a card is already in flight or the deck has no cards.
    pub fn begin_step(&mut self) -> Option<InFlight> {
        if self.in_flight.is_some() {
            return None;
        }
        if self.pending.is_empty() {
            self.moving_right = !self.moving_right;
            self.pending = std::mem::take(&mut self.completed);
        }

        let card = if self.moving_right {
            self.pending.pop_back()
        } else {
            self.pending.pop_front()
        }?;

        let x = if self.moving_right {
            STACK_RIGHT_X
        } else {
            STACK_LEFT_X
        };
        let flight = InFlight {
            card,
            target: stack_position(x, self.completed.len()),
        };
        self.in_flight = Some(flight);
        Some(flight)
    }

    /// Land the card in flight on `completed`.
    pub fn finish_step(&mut self) -> Option<InFlight> {
        let flight = self.in_flight.take()?;
        if self.moving_right {
            self.completed.push_front(flight.card);
        } else {
            self.completed.push_back(flight.card);
        }
        Some(flight)
    }

    pub fn pending(&self) -> &VecDeque<usize> {
        &self.pending
    }

    pub fn completed(&self) -> &VecDeque<usize> {
        &self.completed
    }

    pub fn in_flight(&self) -> Option<InFlight> {
        self.in_flight
    }

    pub fn moving_right(&self) -> bool {
        self.moving_right
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShufflePhase {
    Idle,
    Dealing,
}

#[derive(Clone, Debug)]
enum ShuffleEvent {
    Deal,
}

pub struct ShuffleScene {
    rng: StdRng,
    phase: ShufflePhase,
    faces: Vec<SpriteId>,
    positions: Vec<Vec2>,
    /// Back-to-front draw order; a dealt card is raised to the end.
    draw_order: Vec<usize>,
    deck: Deck,
    flight: Option<(InFlight, Tween<Vec2>)>,
    timeline: Timeline<ShuffleEvent>,
    next_deal: Option<TaskId>,
    offset: Vec2,
}

impl ShuffleScene {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Scene with a caller-provided random source, for reproducible decks.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            phase: ShufflePhase::Idle,
            faces: Vec::new(),
            positions: Vec::new(),
            draw_order: Vec::new(),
            deck: Deck::default(),
            flight: None,
            timeline: Timeline::new(),
            next_deal: None,
            offset: Vec2::ZERO,
        }
    }

    pub fn phase(&self) -> ShufflePhase {
        self.phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Face sprite of every card, by card index.
    pub fn faces(&self) -> &[SpriteId] {
        &self.faces
    }

    pub fn position(&self, card: usize) -> Option<Vec2> {
        self.positions.get(card).copied()
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    fn prompt_rect() -> Rect {
        let corner = PROMPT_POS - PROMPT_HIT / 2.0;
        Rect::new(corner.x, corner.y, PROMPT_HIT.x, PROMPT_HIT.y)
    }

    /// Send the next card off. `age` is how long ago the step came due.
    fn deal(&mut self, age: f32) {
        let Some(flight) = self.deck.begin_step() else {
            return;
        };
        self.draw_order.retain(|&card| card != flight.card);
        self.draw_order.push(flight.card);

        let from = self.positions[flight.card];
        let mut tween = Tween::new(from, flight.target, MOVE_SECS).easing(Easing::EaseOut);
        tween.advance(age);
        self.positions[flight.card] = tween.value();
        tracing::debug!(
            card = flight.card,
            moving_right = self.deck.moving_right(),
            "deal step"
        );
        self.flight = Some((flight, tween));
    }
}

impl Default for ShuffleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for ShuffleScene {
    fn create(&mut self, ctx: &mut SceneContext) -> Creation {
        self.dispose();
        self.phase = ShufflePhase::Idle;
        self.on_resize(ctx.orientation());

        let sheet = match ctx.sprites.sheet(CARDS_ALIAS) {
            Ok(sheet) => sheet.to_vec(),
            Err(err) => {
                tracing::error!(error = %err, "cards could not be loaded");
                return Creation::Ready;
            }
        };

        let deck = build_deck(sheet.len(), CARD_COUNT, &mut self.rng);
        self.faces = deck.iter().map(|&face| sheet[face]).collect();
        self.positions = (0..self.faces.len())
            .map(|index| stack_position(STACK_LEFT_X, index))
            .collect();
        self.draw_order = (0..self.faces.len()).collect();
        self.deck = Deck::new(self.faces.len());

        tracing::info!(cards = self.faces.len(), faces = sheet.len(), "deck built");
        Creation::Ready
    }

    fn dispose(&mut self) {
        if let Some(task) = self.next_deal.take() {
            self.timeline.cancel(task);
        }
        self.timeline.clear();
        self.flight = None;
        self.deck.clear();
        self.faces.clear();
        self.positions.clear();
        self.draw_order.clear();
    }

    fn on_resize(&mut self, orientation: Orientation) {
        self.offset = match orientation {
            Orientation::Landscape => Vec2::ZERO,
            Orientation::Portrait => SHUFFLE_PORTRAIT_OFFSET,
        };
    }

    fn pointer_down(&mut self, _ctx: &mut SceneContext, point: Vec2) {
        if self.phase != ShufflePhase::Idle {
            return;
        }
        if Self::prompt_rect().contains(point - self.offset) {
            self.phase = ShufflePhase::Dealing;
            tracing::info!("shuffle started");
            self.deal(0.0);
        }
    }

    fn update(&mut self, _ctx: &mut SceneContext, dt: f32) {
        // The clock runs first, so a delay scheduled below counts from the end of
        // this frame and is shortened by however long ago the card landed.
        let mut dealt = false;
        for fired in self.timeline.advance(dt) {
            match fired.event {
                ShuffleEvent::Deal => {
                    self.next_deal = None;
                    self.deal(fired.late);
                    dealt = true;
                }
            }
        }
        if let Some((flight, tween)) = &mut self.flight {
            if !dealt {
                tween.advance(dt);
            }
            self.positions[flight.card] = tween.value();
            if tween.is_finished() {
                let landed_ago = tween.overrun();
                // Snap to the exact target before landing.
                self.positions[flight.card] = flight.target;
                self.flight = None;
                self.deck.finish_step();
                self.next_deal = Some(
                    self.timeline
                        .after(DEAL_DELAY_SECS - landed_ago, ShuffleEvent::Deal),
                );
            }
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.with_transform(Affine2::from_translation(self.offset), |canvas| {
            for &card in &self.draw_order {
                canvas.sprite(
                    self.faces[card],
                    Affine2::from_translation(self.positions[card]),
                    None,
                    Color::WHITE,
                );
            }

            let alpha = match self.phase {
                ShufflePhase::Idle => 1.0,
                ShufflePhase::Dealing => 0.5,
            };
            canvas.text(
                PROMPT,
                PROMPT_POS,
                TextStyle::new(24.0, Color::WHITE.with_alpha(alpha)),
            );
        });
    }
}
