use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info};

use crate::alien::{Alien, Soul};
use crate::dance::DanceContext;
use crate::entity::{Affects, Entity, Shot, Starship};
use crate::regulator::GameplayRegulator;
use crate::renderer::Hud;
use crate::sprite::SpriteSource;
use crate::wave::{Wave, WaveContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Playing,
    GameOver,
    Victory,
}

/// The outcome of one shot hitting one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    AlienDestroyed { soul: Soul },
    StarshipDestroyed { survivors: usize },
}

/// Every entity on the board. Aliens live in exactly one of the incoming or
/// resident collections.
#[derive(Debug, Clone, Default)]
pub struct Game {
    pub starships: Vec<Starship>,
    pub resident_aliens: Vec<Alien>,
    pub incoming_aliens: Vec<Alien>,
    pub shots: Vec<Shot>,
}

impl Game {
    pub fn new(starship: Starship) -> Self {
        Self {
            starships: vec![starship],
            ..Self::default()
        }
    }

    pub fn add_alien(&mut self, alien: Alien) {
        if alien.is_incoming() {
            self.incoming_aliens.push(alien);
        } else {
            self.resident_aliens.push(alien);
        }
    }

    pub fn aliens(&self) -> impl Iterator<Item = &Alien> {
        self.resident_aliens.iter().chain(self.incoming_aliens.iter())
    }

    pub fn live_starships(&self) -> usize {
        self.starships.iter().filter(|s| s.body.is_alive()).count()
    }

    pub fn has_live_aliens(&self) -> bool {
        self.aliens().any(|alien| alien.body.is_alive())
    }

    /// Starships, then resident aliens, then incoming aliens.
    pub fn drawable_entities(&self) -> impl Iterator<Item = &Entity> {
        self.starships
            .iter()
            .map(|starship| &starship.body)
            .chain(self.aliens().map(|alien| &alien.body))
    }

    fn drawable_entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.starships
            .iter_mut()
            .map(|starship| &mut starship.body)
            .chain(self.resident_aliens.iter_mut().map(|alien| &mut alien.body))
            .chain(self.incoming_aliens.iter_mut().map(|alien| &mut alien.body))
    }

    /// Gives every unrendered shape the mask `source` produces for it, if any.
    pub fn attach_sprites(&mut self, source: &mut impl SpriteSource) {
        for entity in self.drawable_entities_mut() {
            if entity.shape.is_rendered() {
                continue;
            }
            if let Some(mask) = source.render(&entity.shape) {
                entity.shape.attach_mask(mask);
            }
        }
    }

    /// Moves every starship by `dx`, or none of them if the one furthest in
    /// that direction would leave the board.
    pub fn move_each_starship(&mut self, dx: f64) -> bool {
        let extreme = if dx >= 0.0 {
            self.starships
                .iter()
                .max_by(|a, b| a.body.position.x.total_cmp(&b.body.position.x))
        } else {
            self.starships
                .iter()
                .min_by(|a, b| a.body.position.x.total_cmp(&b.body.position.x))
        };
        match extreme {
            Some(starship) if starship.can_move_by(dx) => {}
            _ => {
                debug!(dx, "starship move rejected");
                return false;
            }
        }
        for starship in &mut self.starships {
            starship.move_by(dx);
        }
        true
    }

    pub fn fire_starship_shot(&mut self) {
        let shots: Vec<Shot> = self
            .starships
            .iter()
            .filter(|starship| starship.body.is_alive())
            .map(Starship::create_shot)
            .collect();
        self.shots.extend(shots);
    }

    /// Advances every shot by `distance`. Shots that leave the board vanish;
    /// a shot that hits something destroys its first live target and is
    /// consumed, so each shot produces at most one event.
    pub fn move_all_shots(&mut self, distance: f64, debug_assertions: bool) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        for mut shot in std::mem::take(&mut self.shots) {
            shot.advance(distance);
            if shot.is_out_of_bounds() {
                continue;
            }
            match self.resolve_hit(&shot, debug_assertions) {
                Some(event) => events.push(event),
                None => self.shots.push(shot),
            }
        }
        events
    }

    fn resolve_hit(&mut self, shot: &Shot, debug_assertions: bool) -> Option<CollisionEvent> {
        match shot.affects {
            Affects::Aliens => {
                let alien = self
                    .resident_aliens
                    .iter_mut()
                    .chain(self.incoming_aliens.iter_mut())
                    .find(|alien| {
                        alien.body.is_alive() && alien.body.collides_with(shot, debug_assertions)
                    })?;
                alien.body.destroy();
                Some(CollisionEvent::AlienDestroyed { soul: alien.soul })
            }
            Affects::Starships => {
                let starship = self.starships.iter_mut().find(|starship| {
                    starship.body.is_alive() && starship.body.collides_with(shot, debug_assertions)
                })?;
                starship.body.destroy();
                Some(CollisionEvent::StarshipDestroyed {
                    survivors: self.live_starships(),
                })
            }
        }
    }

    /// Runs one dance step for every live alien. Incoming aliens go first;
    /// one whose spiral ceded on an earlier dance joins the residents now and
    /// dances with them. Residents may open fire.
    pub fn dance_aliens(&mut self, rng: &mut impl Rng) {
        let ctx = DanceContext { shots: &self.shots };

        let (arrived, mut incoming): (Vec<Alien>, Vec<Alien>) =
            std::mem::take(&mut self.incoming_aliens)
                .into_iter()
                .partition(|alien| !alien.is_incoming());
        for alien in incoming.iter_mut().filter(|a| a.body.is_alive()) {
            alien.dance(&ctx);
        }
        self.incoming_aliens = incoming;
        self.resident_aliens.extend(arrived);

        let mut fired = Vec::new();
        for alien in self.resident_aliens.iter_mut().filter(|a| a.body.is_alive()) {
            alien.dance(&ctx);
            if rng.gen_ratio(1, alien.soul.fire_chance()) {
                fired.push(alien.create_shot());
            }
        }
        self.shots.extend(fired);
    }

    /// Advances death animations.
    pub fn tick_entities(&mut self) {
        for entity in self.drawable_entities_mut() {
            entity.tick();
        }
    }

    /// Drops entities whose death animation has finished. Returns how many went.
    pub fn cleanup_entities(&mut self) -> usize {
        let before = self.starships.len() + self.resident_aliens.len() + self.incoming_aliens.len();
        self.starships.retain(|s| !s.body.is_finished());
        self.resident_aliens.retain(|a| !a.body.is_finished());
        self.incoming_aliens.retain(|a| !a.body.is_finished());
        before - (self.starships.len() + self.resident_aliens.len() + self.incoming_aliens.len())
    }
}

/// A whole match: the board, its pacing, the waves still to come and the
/// score. The host owns it and drives it through [`Galaga::tick`] and the
/// input methods.
pub struct Galaga<R> {
    pub game: Game,
    pub regulator: GameplayRegulator,
    waves: VecDeque<Wave>,
    ticks: u64,
    level: u32,
    score: u64,
    state: MatchState,
    debug: bool,
    rng: R,
}

impl<R: Rng> Galaga<R> {
    pub fn new(game: Game, regulator: GameplayRegulator, waves: VecDeque<Wave>, rng: R) -> Self {
        Self {
            game,
            regulator,
            waves,
            ticks: 0,
            level: 0,
            score: 0,
            state: MatchState::Playing,
            debug: false,
            rng,
        }
    }

    /// Ticks played so far; the regulator's cadences count against it.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == MatchState::Playing
    }

    pub fn waves_remaining(&self) -> usize {
        self.waves.len()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            level: self.level,
            state: self.state,
            debug: self.debug,
        }
    }

    /// In debug mode the host stops ticking on its timer and advances the
    /// match with [`Galaga::step`] instead.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn step(&mut self) {
        self.tick();
    }

    pub fn attach_sprites(&mut self, source: &mut impl SpriteSource) {
        self.game.attach_sprites(source);
    }

    pub fn move_each_starship(&mut self, dx: f64) -> bool {
        self.is_playing() && self.game.move_each_starship(dx)
    }

    pub fn fire_starship_shot(&mut self) {
        if self.is_playing() {
            self.game.fire_starship_shot();
        }
    }

    pub fn tick(&mut self) {
        self.ticks += 1;
        let tick = self.ticks;

        if self.is_playing() && self.regulator.should_move_shots(tick) {
            let events = self
                .game
                .move_all_shots(self.regulator.shot_distance, self.regulator.debug_assertions);
            for event in events {
                self.handle_collision(event);
            }
        }

        if self.is_playing() && self.regulator.should_dance(tick) {
            self.game.dance_aliens(&mut self.rng);
        }

        self.game.tick_entities();

        if self.regulator.should_clean_up(tick) {
            let removed = self.game.cleanup_entities();
            if removed > 0 {
                debug!(removed, "finished entities swept");
            }
        }

        if self.is_playing() && self.regulator.should_check_spawn(tick) && !self.game.has_live_aliens() {
            self.spawn_next_wave();
        }
    }

    /// Releases the next wave, or declares victory when none are left.
    /// Returns whether a wave was released.
    pub fn spawn_next_wave(&mut self) -> bool {
        let Some(wave) = self.waves.pop_front() else {
            info!(score = self.score, "all waves cleared");
            self.state = MatchState::Victory;
            return false;
        };
        self.level += 1;
        let aliens = wave(&WaveContext { level: self.level });
        info!(level = self.level, aliens = aliens.len(), "wave spawned");
        for alien in aliens {
            self.game.add_alien(alien);
        }
        true
    }

    fn handle_collision(&mut self, event: CollisionEvent) {
        match event {
            CollisionEvent::AlienDestroyed { soul } => {
                let points = soul.score_when_killed(self.level);
                self.score += points;
                debug!(?soul, points, score = self.score, "alien destroyed");
            }
            CollisionEvent::StarshipDestroyed { survivors } => {
                info!(survivors, "starship destroyed");
                if survivors == 0 {
                    info!(score = self.score, level = self.level, "game over");
                    self.state = MatchState::GameOver;
                }
            }
        }
    }
}
