//! Behavioural tests for liquid running off obstacles using rust-rspec.
//!
//! Liquid that lands on something other than a vessel follows the slope to
//! the obstacle's edge and drops again, up to the source's edge budget.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use decant::config::SceneConfig;
use decant::TickReport;
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::fixtures::{
    jug_over_shelf, jug_through_trigger, ramp_cascade, ramp_without_bowl, BOWL, CUP, JUG, TAP,
};
use test_utils::{assert_litres_close, LiquidScene};

const DT: f32 = 0.02;

#[derive(Debug, Clone)]
struct CascadeFixture {
    scene: LiquidScene,
    total_before: f32,
    report: TickReport,
}

impl CascadeFixture {
    fn load(config: &SceneConfig) -> Self {
        let scene = LiquidScene::from_config(config);
        Self {
            total_before: scene.world.total_litres(),
            scene,
            report: TickReport::default(),
        }
    }

    fn step(&mut self) {
        self.report = self.scene.step(DT);
    }

    fn drops(&self, source: decant::ObjectId) -> u32 {
        self.scene.vessel(source).split.current_drop()
    }

    fn assert_single_loss(&self) {
        assert_eq!(self.report.splashes.len(), 1, "the source poured");
        assert!(self.report.transfers.is_empty());
        let loss = self.report.losses.first().expect("the pour is lost");
        assert!(loss.litres > 0.0);
        assert_litres_close(self.scene.world.total_litres(), self.total_before - loss.litres);
    }
}

#[test]
fn runoff_follows_the_ramp_into_the_bowl() {
    run_serial(&rspec::given(
        "a full tap above a ramp that slopes toward a bowl",
        CascadeFixture::load(&ramp_cascade()),
        |scenario: &mut Scenario<CascadeFixture>| {
            scenario.before_each(|state| *state = CascadeFixture::load(&ramp_cascade()));

            scenario.when("the world steps once", |ctx| {
                ctx.before_each(CascadeFixture::step);

                ctx.then("the liquid drops off one edge", |state| {
                    assert_eq!(state.drops(TAP), 1);
                });

                ctx.then("the bowl receives everything the tap lost", |state| {
                    let transfer = state.report.transfers.first().expect("bowl is reached");
                    assert_eq!(transfer.destination, BOWL);
                    assert_litres_close(state.scene.litres(BOWL), transfer.litres);
                    assert_litres_close(state.scene.world.total_litres(), state.total_before);
                    assert!(state.report.losses.is_empty());
                });
            });

            scenario.when("the tap has no edge budget", |ctx| {
                ctx.before_each(|state| {
                    let tap_config = ramp_cascade()
                        .vessels
                        .into_iter()
                        .find(|v| v.id == TAP.into_inner())
                        .map(|mut v| {
                            v.split.max_edge_drops = 0;
                            v
                        })
                        .expect("tap is configured");
                    state.scene.add_vessel(&tap_config);
                    state.total_before = state.scene.world.total_litres();
                    state.step();
                });

                ctx.then("the search gives up on the ramp", |state| {
                    assert_eq!(state.drops(TAP), 0);
                    state.assert_single_loss();
                    assert_eq!(state.scene.litres(BOWL), 0.0);
                });
            });
        },
    ));
}

#[test]
fn runoff_without_a_receiver_is_lost() {
    run_serial(&rspec::given(
        "a full tap above a ramp with nothing below it",
        CascadeFixture::load(&ramp_without_bowl()),
        |scenario: &mut Scenario<CascadeFixture>| {
            scenario.before_each(|state| *state = CascadeFixture::load(&ramp_without_bowl()));

            scenario.when("the world steps once", |ctx| {
                ctx.before_each(CascadeFixture::step);

                ctx.then("the liquid leaves the ramp and disappears", |state| {
                    assert_eq!(state.drops(TAP), 1);
                    state.assert_single_loss();
                });
            });
        },
    ));
}

#[test]
fn obstacles_between_jug_and_cup() {
    run_serial(&rspec::given(
        "a jug tipped over a cup with a slab in between",
        CascadeFixture::load(&jug_over_shelf()),
        |scenario: &mut Scenario<CascadeFixture>| {
            scenario.when("the slab is a level shelf", |ctx| {
                ctx.before_each(|state| {
                    *state = CascadeFixture::load(&jug_over_shelf());
                    state.step();
                });

                ctx.then("liquid pools on the shelf and is lost", |state| {
                    assert_eq!(state.drops(JUG), 0);
                    state.assert_single_loss();
                });
            });

            scenario.when("the slab is a trigger volume", |ctx| {
                ctx.before_each(|state| {
                    *state = CascadeFixture::load(&jug_through_trigger());
                    state.step();
                });

                ctx.then("liquid passes through into the cup", |state| {
                    let transfer = state.report.transfers.first().expect("cup is reached");
                    assert_eq!(transfer.destination, CUP);
                    assert_litres_close(state.scene.world.total_litres(), state.total_before);
                });
            });
        },
    ));
}
