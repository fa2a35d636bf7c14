use dash_engine::{
    build_render_buffer, EngineContext, FixedTimestep, Game, GameConfig, GameEvent,
    InputEvent, InputQueue, RenderBuffer,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::new(&config),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            timestep: FixedTimestep::new(config.fixed_dt),
            config,
            game,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Forget held keys, e.g. when the page loses focus.
    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    /// Mutable access to the game, for bridge calls outside the frame loop.
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Run one frame: fixed-step updates with physics, camera follow,
    /// then rebuild the render buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            // Discrete events reach exactly one step; held keys carry over.
            self.input.drain();
            #[cfg(feature = "physics")]
            self.ctx.step_physics();

            let target = self
                .game
                .camera_target(&self.ctx)
                .and_then(|id| self.ctx.scene.get(id))
                .map(|e| e.center());
            if let Some(target) = target {
                self.ctx.camera.follow(target);
            }
        }

        build_render_buffer(self.ctx.scene.iter(), &self.ctx.camera, &mut self.render_buffer);
        self.game.render(&self.ctx, &mut self.render_buffer);

        if self.ctx.events.len() > self.config.max_events {
            log::warn!(
                "{} game events this frame, keeping the last {}",
                self.ctx.events.len(),
                self.config.max_events
            );
            let excess = self.ctx.events.len() - self.config.max_events;
            self.ctx.events.drain(..excess);
        }
    }

    // ---- Pointer accessors for JS memory reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn camera_scroll_x(&self) -> f32 {
        self.ctx.camera.scroll_x
    }

    pub fn view_width(&self) -> f32 {
        self.config.view_width
    }

    pub fn view_height(&self) -> f32 {
        self.config.view_height
    }

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn event_floats(&self) -> u32 {
        GameEvent::FLOATS as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_engine::{Entity, EntityId};

    struct Counter {
        updates: u32,
        keys_seen: u32,
        hero: Option<EntityId>,
    }

    impl Game for Counter {
        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.scene.spawn(Entity::new(id).with_tag("hero"));
            self.hero = Some(id);
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            self.keys_seen += input.iter().count() as u32;
            ctx.emit_event(GameEvent::single(1.0, self.updates as f32));
        }

        fn camera_target(&self, _ctx: &EngineContext) -> Option<EntityId> {
            self.hero
        }
    }

    fn runner() -> GameRunner<Counter> {
        GameRunner::new(Counter { updates: 0, keys_seen: 0, hero: None })
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut r = runner();
        r.tick(1.0 / 60.0);
        assert_eq!(r.game_mut().updates, 0);
    }

    #[test]
    fn each_event_reaches_one_step() {
        let mut r = runner();
        r.init();
        r.push_input(InputEvent::KeyDown { key_code: 39 });
        r.tick(2.0 / 60.0 + 0.001);
        assert_eq!(r.game_mut().updates, 2);
        assert_eq!(r.game_mut().keys_seen, 1, "event seen by the first step only");

        r.tick(1.0 / 60.0);
        assert_eq!(r.game_mut().keys_seen, 1);
        assert_eq!(r.game_events_len(), 1);
    }

    #[test]
    fn events_wait_for_a_step() {
        let mut r = runner();
        r.init();
        r.push_input(InputEvent::Custom { kind: 1, a: 0.0, b: 0.0, c: 0.0 });
        r.tick(0.001);
        assert_eq!(r.game_mut().updates, 0);
        r.tick(1.0 / 60.0);
        assert_eq!(r.game_mut().keys_seen, 1);
    }
}
