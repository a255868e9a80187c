//! The control loop wiring inputs, settings and the display together.

use embedded_hal::delay::DelayNs;
use uvmeter_dsp::rolling_window::RollingWindow;

use crate::config::{Config, Smoothing};
use crate::debouncer::{Debouncer, Edge, Timestamp};
use crate::display::{Display, LedSink};
use crate::input::Snapshot;
use crate::log;
use crate::persistence::Persistence;
use crate::settings::Settings;
use crate::storage::Storage;
use crate::store::Store;

/// The whole meter.
///
/// It is meant to be ticked from the main loop of the firmware, roughly
/// every millisecond, with a fresh snapshot of inputs. `PIXELS` is the
/// length of the strip, `WINDOW` the number of sensor samples smoothened
/// over.
#[derive(Debug)]
pub struct Control<L, S, const PIXELS: usize, const WINDOW: usize> {
    config: Config,
    button: Debouncer,
    window: RollingWindow<u16, WINDOW>,
    store: Store<S>,
    display: Display<L, PIXELS>,
}

/// Outcome of a single tick, useful for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reaction {
    pub button: Edge,
    /// Intensity passed to the display.
    pub intensity: u16,
    pub saved: bool,
}

impl<L, S, const PIXELS: usize, const WINDOW: usize> Control<L, S, PIXELS, WINDOW>
where
    L: LedSink,
    S: Storage,
{
    /// Load settings from the storage and prepare the strip.
    ///
    /// The button is expected to be released at `now`.
    pub fn new(config: Config, sink: L, storage: S, now: Timestamp) -> Self {
        let store = Store::new(
            Persistence::new(storage, config.storage_address),
            config.save_delay,
        );
        let display = Display::new(
            sink,
            config.policy,
            config.level.max_intensity(),
            store.current().brightness.level(),
            config.power_limit,
        );
        log::info!("Starting with settings={:?}", store.current());
        Self {
            config,
            button: Debouncer::new(config.debounce_window, false, now),
            window: RollingWindow::new(),
            store,
            display,
        }
    }

    /// Greet the user on power up. This blocks for about a second.
    pub fn start(&mut self, delay: &mut impl DelayNs) {
        self.display.greet(self.config.greeting_brightness, delay);
    }

    pub fn tick(&mut self, snapshot: Snapshot, now: Timestamp, delay: &mut impl DelayNs) -> Reaction {
        let button = self.button.poll(snapshot.button, now);
        if button == Edge::RisingStable {
            self.acknowledge_click(now, delay);
        }

        let intensity = self.sample_sensor(snapshot.sensor);
        self.display.render(intensity);

        let saved = self.store.tick(now);
        if saved {
            let flash = self.config.flash;
            self.display
                .flash(flash.saved, flash.brightness, flash.duration, delay);
        }

        Reaction {
            button,
            intensity,
            saved,
        }
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.store.current()
    }

    pub fn display(&self) -> &Display<L, PIXELS> {
        &self.display
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    fn acknowledge_click(&mut self, now: Timestamp, delay: &mut impl DelayNs) {
        let flash = self.config.flash;
        self.display
            .flash(flash.acknowledge, flash.brightness, flash.duration, delay);
        let _settings = self.store.advance_mode(now, &mut self.display);
        log::debug!("Button clicked, settings={:?}", _settings);
    }

    fn sample_sensor(&mut self, raw: u16) -> u16 {
        self.window.push(self.config.level.waveform_to_intensity(raw));
        match self.config.smoothing {
            Smoothing::Average => self.window.rolling_average(),
            Smoothing::Peak => self.window.rolling_max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{self, OFF};
    use crate::display::Policy;
    use crate::save::Record;
    use crate::settings::Brightness;
    use crate::storage::MemoryStorage;
    use crate::testing::{NoDelay, RecordingSink};
    use uvmeter_dsp::level::LevelMapper;

    const SILENCE: u16 = 512;
    const LOUD: u16 = 0;

    type TestControl = Control<RecordingSink<12>, MemoryStorage<64>, 12, 30>;

    fn control_with(config: Config, storage: MemoryStorage<64>) -> TestControl {
        Control::new(config, RecordingSink::new(), storage, 0)
    }

    fn control() -> TestControl {
        control_with(Config::default(), MemoryStorage::new())
    }

    /// Tick every millisecond in `from..to`, return number of saves.
    fn run(
        control: &mut TestControl,
        from: u32,
        to: u32,
        snapshot: Snapshot,
        delay: &mut NoDelay,
    ) -> u32 {
        let mut saves = 0;
        for now in from..to {
            if control.tick(snapshot, now, delay).saved {
                saves += 1;
            }
        }
        saves
    }

    fn idle(sensor: u16) -> Snapshot {
        Snapshot {
            button: false,
            sensor,
        }
    }

    fn pressed(sensor: u16) -> Snapshot {
        Snapshot {
            button: true,
            sensor,
        }
    }

    fn writes(control: &TestControl) -> u32 {
        control.store().persistence().storage().writes()
    }

    #[test]
    fn when_started_on_erased_storage_it_uses_and_stores_defaults() {
        let control = control();
        assert_eq!(control.settings(), Settings::default());
        assert_eq!(control.display().sink().brightness, Brightness::Mid.level());
        assert_eq!(control.display().sink().power_limit, Some(Config::default().power_limit));
        assert_eq!(writes(&control), 1);
    }

    #[test]
    fn when_started_it_restores_stored_brightness() {
        let mut storage = MemoryStorage::<64>::new();
        let address = Config::default().storage_address;
        let bytes = Record::new(Settings {
            brightness: Brightness::Ultra,
        })
        .to_bytes();
        storage.write(address, &bytes);

        let control = control_with(Config::default(), storage);

        assert_eq!(control.settings().brightness, Brightness::Ultra);
        assert_eq!(control.display().sink().brightness, 255);
    }

    #[test]
    fn when_greeting_on_start_the_strip_ends_dark() {
        let mut control = control();
        let mut delay = NoDelay::default();
        control.start(&mut delay);
        assert_eq!(control.display().sink().shown, [OFF; 12]);
        assert!(delay.elapsed_ms() > 900);
    }

    #[test]
    fn given_dim_stored_brightness_the_greeting_is_shown_at_full() {
        let mut storage = MemoryStorage::<64>::new();
        let bytes = Record::new(Settings {
            brightness: Brightness::Low,
        })
        .to_bytes();
        storage.write(Config::default().storage_address, &bytes);
        let mut control = control_with(Config::default(), storage);
        let mut delay = NoDelay::default();

        control.start(&mut delay);

        let sink = control.display().sink();
        assert_eq!(sink.history.len(), 13);
        for (brightness, _) in sink.history.iter().take(12) {
            assert_eq!(*brightness, u8::MAX);
        }
        assert_eq!(sink.brightness, Brightness::Low.level());
        assert_eq!(control.display().brightness(), Brightness::Low.level());
    }

    #[test]
    fn given_zero_midpoint_the_strip_stays_dark() {
        let config = Config {
            level: LevelMapper::with_midpoint(0),
            ..Config::default()
        };
        let mut control = control_with(config, MemoryStorage::new());
        let mut delay = NoDelay::default();
        run(&mut control, 0, 50, idle(LOUD), &mut delay);
        assert_eq!(control.display().sink().shown, [OFF; 12]);
    }

    #[test]
    fn when_silent_all_pixels_are_off() {
        let mut control = control();
        let mut delay = NoDelay::default();
        run(&mut control, 0, 100, idle(SILENCE), &mut delay);
        assert_eq!(control.display().sink().shown, [OFF; 12]);
    }

    #[test]
    fn when_loud_the_whole_strip_is_lit() {
        let mut control = control();
        let mut delay = NoDelay::default();
        run(&mut control, 0, 100, idle(LOUD), &mut delay);
        let shown = control.display().sink().shown;
        for (i, pixel) in shown.iter().enumerate() {
            assert_eq!(*pixel, color::gradient(i, 12));
        }
    }

    #[test]
    fn when_sensor_averages_to_half_half_of_the_strip_is_lit() {
        let mut control = control();
        let mut delay = NoDelay::default();
        // Deviation of 256 both below and above the mid-rail.
        for now in 0..60 {
            let sensor = if now % 2 == 0 { 256 } else { 768 };
            let reaction = control.tick(idle(sensor), now, &mut delay);
            assert_eq!(reaction.intensity, 256);
        }
        let shown = control.display().sink().shown;
        assert_ne!(shown[5], OFF);
        assert_eq!(shown[6..], [OFF; 6]);
    }

    #[test]
    fn given_peak_smoothing_a_single_spike_holds_for_the_window() {
        let config = Config {
            smoothing: Smoothing::Peak,
            policy: Policy::bands(),
            ..Config::default()
        };
        let mut control = control_with(config, MemoryStorage::new());
        let mut delay = NoDelay::default();

        assert_eq!(control.tick(idle(LOUD), 0, &mut delay).intensity, 512);
        for now in 1..30 {
            assert_eq!(control.tick(idle(SILENCE), now, &mut delay).intensity, 512);
        }
        assert_eq!(control.tick(idle(SILENCE), 30, &mut delay).intensity, 0);
    }

    #[test]
    fn when_button_is_pressed_long_enough_brightness_advances_once() {
        let mut control = control();
        let mut delay = NoDelay::default();
        run(&mut control, 0, 100, idle(SILENCE), &mut delay);
        run(&mut control, 100, 400, pressed(SILENCE), &mut delay);
        run(&mut control, 400, 600, idle(SILENCE), &mut delay);

        assert_eq!(control.settings().brightness, Brightness::High);
        assert_eq!(control.display().sink().brightness, Brightness::High.level());
        assert!(control.store().pending_save());
        // Acknowledged by a flash.
        assert_eq!(delay.elapsed_ms(), u64::from(Config::default().flash.duration));
    }

    #[test]
    fn when_button_bounces_briefly_nothing_changes() {
        let mut control = control();
        let mut delay = NoDelay::default();
        run(&mut control, 0, 100, idle(SILENCE), &mut delay);
        run(&mut control, 100, 130, pressed(SILENCE), &mut delay);
        run(&mut control, 130, 300, idle(SILENCE), &mut delay);

        assert_eq!(control.settings(), Settings::default());
        assert!(!control.store().pending_save());
        assert_eq!(delay.elapsed_ms(), 0);
    }

    #[test]
    fn when_clicked_settings_are_saved_after_quiet_period() {
        let mut control = control();
        let mut delay = NoDelay::default();
        run(&mut control, 0, 100, idle(SILENCE), &mut delay);
        // Rising edge is confirmed at 151, save is due 10 seconds later.
        run(&mut control, 100, 200, pressed(SILENCE), &mut delay);
        assert_eq!(run(&mut control, 200, 10_151, idle(SILENCE), &mut delay), 0);

        assert_eq!(run(&mut control, 10_151, 10_152, idle(SILENCE), &mut delay), 1);

        let flash = Config::default().flash;
        let sink = control.display().sink();
        assert_eq!(sink.previous, (flash.brightness, [flash.saved; 12]));
        assert_eq!(sink.brightness, Brightness::High.level());
        assert_eq!(writes(&control), 2);
        assert_eq!(delay.elapsed_ms(), 2 * u64::from(flash.duration));

        assert_eq!(run(&mut control, 10_152, 30_000, idle(SILENCE), &mut delay), 0);
    }

    #[test]
    fn when_clicked_repeatedly_only_the_last_settings_get_written() {
        let mut control = control();
        let mut delay = NoDelay::default();
        let mut now = 0;
        for _ in 0..3 {
            run(&mut control, now, now + 100, idle(SILENCE), &mut delay);
            run(&mut control, now + 100, now + 200, pressed(SILENCE), &mut delay);
            now += 200;
        }

        let saves = run(&mut control, now, now + 11_000, idle(SILENCE), &mut delay);

        assert_eq!(saves, 1);
        assert_eq!(writes(&control), 2);
        // Mid -> High -> Ultra -> Low
        assert_eq!(control.settings().brightness, Brightness::Low);
        let mut storage = control.store().persistence().storage().clone();
        let mut persistence = Persistence::new(&mut storage, Config::default().storage_address);
        assert_eq!(persistence.load().brightness, Brightness::Low);
    }
}
