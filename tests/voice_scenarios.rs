use tracker_voice::{
    dsp::{oscillator::Oscillator, EnvelopeState},
    error::STATUS_TOO_SHORT,
    instrument::{
        ArpeggioTable, EnvelopeParams, InstrumentData, PcmSample, SequencerStep, VibratoParams,
        WavetableSource,
    },
    synth::{Context, ParamId, VoiceHandle},
    TICK_RATE_HZ,
};

/// At 50 Hz every rendered frame is exactly one tick.
const ONE_FRAME_PER_TICK: u32 = TICK_RATE_HZ as u32;

fn context_with(instrument: InstrumentData, sample_rate: u32) -> (Context, VoiceHandle) {
    let mut ctx = Context::new(sample_rate).unwrap();
    let voice = ctx.create_voice().unwrap();
    ctx.load_instrument(voice, &instrument.to_bytes()).unwrap();
    (ctx, voice)
}

fn render_ticks(ctx: &mut Context, voice: VoiceHandle, ticks: usize) -> Vec<f32> {
    let mut left = vec![0.0; ticks];
    let mut right = vec![0.0; ticks];
    ctx.render(voice, &mut left, &mut right);
    left
}

fn envelope_volume(ctx: &Context, voice: VoiceHandle) -> f32 {
    ctx.voice(voice).unwrap().envelope_volume()
}

#[test]
fn adsr_timeline() {
    let envelope = EnvelopeParams {
        attack_length: 4,
        attack_level: 64,
        decay_length: 8,
        decay_level: 32,
        sustain_level: 32,
        sustain_ticks: 0,
        release_length: 8,
    };
    let instrument = InstrumentData::wavetable(WavetableSource::new(16)).with_envelope(envelope);
    let (mut ctx, voice) = context_with(instrument, ONE_FRAME_PER_TICK);

    ctx.note_on(voice, 60, 127);
    render_ticks(&mut ctx, voice, 4);
    assert_eq!(envelope_volume(&ctx, voice), 64.0);

    render_ticks(&mut ctx, voice, 8);
    assert_eq!(envelope_volume(&ctx, voice), 32.0);
    assert_eq!(
        ctx.voice(voice).unwrap().envelope_state(),
        EnvelopeState::Sustain
    );

    ctx.note_off(voice);
    render_ticks(&mut ctx, voice, 7);
    assert!(ctx.voice(voice).unwrap().is_active());
    render_ticks(&mut ctx, voice, 1);
    assert_eq!(envelope_volume(&ctx, voice), 0.0);
    assert!(!ctx.voice(voice).unwrap().is_active());

    let tail = render_ticks(&mut ctx, voice, 32);
    assert!(tail.iter().all(|&s| s == 0.0));
}

#[test]
fn envelope_phases_are_monotonic_at_audio_rate() {
    let instrument = InstrumentData::wavetable(WavetableSource::new(16));
    let (mut ctx, voice) = context_with(instrument, 44_100);
    ctx.note_on(voice, 60, 127);

    let mut previous = (EnvelopeState::Attack, 0.0f32);
    for block in 0..200 {
        if block == 100 {
            ctx.note_off(voice);
            previous = (EnvelopeState::Release, envelope_volume(&ctx, voice));
        }
        render_ticks(&mut ctx, voice, 441);
        let state = ctx.voice(voice).unwrap().envelope_state();
        let volume = envelope_volume(&ctx, voice);
        if state == previous.0 {
            match state {
                EnvelopeState::Attack => assert!(volume >= previous.1),
                EnvelopeState::Decay | EnvelopeState::Release => assert!(volume <= previous.1),
                EnvelopeState::Sustain => assert_eq!(volume, previous.1),
                EnvelopeState::Off => assert_eq!(volume, 0.0),
            }
        }
        previous = (state, volume);
    }
    assert_eq!(previous.0, EnvelopeState::Off);
}

#[test]
fn pcm_loop_stays_inside_loop_region() {
    let sample = PcmSample::new((0..100).map(|i| i as i8).collect()).with_loop(10, 20);
    let (mut ctx, voice) = context_with(InstrumentData::pcm(sample), 44_100);
    ctx.note_on(voice, 60, 127);

    let mut wrapped = false;
    for _ in 0..2_000 {
        render_ticks(&mut ctx, voice, 7);
        let phase = ctx.voice(voice).unwrap().oscillator().phase();
        assert!(phase < 30.0, "phase {phase} escaped the loop");
        if wrapped {
            assert!(phase >= 10.0, "phase {phase} fell below loop start");
        }
        wrapped |= phase >= 10.0;
    }
    assert!(ctx.voice(voice).unwrap().is_active());
}

#[test]
fn one_shot_sample_ends_by_itself() {
    let (mut ctx, voice) = context_with(InstrumentData::pcm(PcmSample::new(vec![90; 2_000])), 44_100);
    ctx.note_on(voice, 60, 127);

    let mut left = vec![0.0; 4_096];
    let mut right = vec![0.0; 4_096];
    let produced = ctx.render(voice, &mut left, &mut right);
    assert!(produced < 2_000);
    assert!(!ctx.voice(voice).unwrap().is_active());
    assert!(left[produced..].iter().all(|&s| s == 0.0));
    assert!(left[..produced].iter().any(|&s| s != 0.0));
}

#[test]
fn short_one_shot_sounds_from_its_first_frame() {
    let (mut ctx, voice) = context_with(InstrumentData::pcm(PcmSample::new(vec![100; 800])), 44_100);
    ctx.note_on(voice, 48, 127);
    assert_eq!(envelope_volume(&ctx, voice), 64.0);

    let mut left = vec![0.0; 1_024];
    let mut right = vec![0.0; 1_024];
    let produced = ctx.render(voice, &mut left, &mut right);
    assert!((799..=801).contains(&produced), "produced {produced}");
    assert!(left[..produced].iter().all(|&s| s > 0.0));
    assert!(!ctx.voice(voice).unwrap().is_active());
}

#[test]
fn wave_zero_step_plays_with_its_transpose() {
    let source = WavetableSource::new(20).with_sequence(1, &[SequencerStep::new(0, 12)]);
    let (mut ctx, voice) = context_with(InstrumentData::wavetable(source), 44_100);
    let (mut plain, plain_voice) = context_with(InstrumentData::wavetable(WavetableSource::new(0)), 44_100);
    ctx.note_on(voice, 48, 127);
    plain.note_on(plain_voice, 60, 127);

    let osc = ctx.voice(voice).unwrap().oscillator();
    let Oscillator::Wavetable(table) = osc else {
        panic!("expected wavetable oscillator");
    };
    assert_eq!(table.wave(), 0);
    assert_eq!(
        osc.increment(),
        plain.voice(plain_voice).unwrap().oscillator().increment()
    );
}

#[test]
fn short_pcm_blob_leaves_voice_untouched() {
    let instrument = InstrumentData::wavetable(WavetableSource::new(16));
    let (mut ctx, voice) = context_with(instrument.clone(), 44_100);
    ctx.note_on(voice, 60, 127);
    render_ticks(&mut ctx, voice, 2_000);

    let err = ctx.load_instrument(voice, &[1, 64]).unwrap_err();
    assert_eq!(err.status_code(), STATUS_TOO_SHORT);

    let state = ctx.voice(voice).unwrap();
    assert_eq!(state.instrument(), Some(&instrument));
    assert!(state.is_active());
}

#[test]
fn arpeggio_cycles_every_four_ticks() {
    let instrument = InstrumentData::wavetable(WavetableSource::new(40))
        .with_arpeggio(ArpeggioTable::new(&[0, 12, 7, 0]));
    let (mut ctx, voice) = context_with(instrument.clone(), ONE_FRAME_PER_TICK);
    ctx.load_instrument_data(voice, instrument).unwrap();
    ctx.note_on(voice, 48, 127);

    let mut indices = Vec::new();
    for _ in 0..8 {
        render_ticks(&mut ctx, voice, 1);
        indices.push(ctx.voice(voice).unwrap().arpeggio_index());
    }
    assert_eq!(indices, vec![1, 2, 3, 0, 1, 2, 3, 0]);
}

#[test]
fn arpeggio_raises_pitch_by_an_octave() {
    let instrument = InstrumentData::wavetable(WavetableSource::new(40))
        .with_arpeggio(ArpeggioTable::new(&[0, 12]).with_speed(2));
    let (mut ctx, voice) = context_with(instrument.clone(), ONE_FRAME_PER_TICK);
    ctx.load_instrument_data(voice, instrument).unwrap();
    ctx.note_on(voice, 48, 127);

    let base = ctx.voice(voice).unwrap().oscillator().increment();
    render_ticks(&mut ctx, voice, 2);
    let raised = ctx.voice(voice).unwrap().oscillator().increment();
    assert!((raised / base - 2.0).abs() < 1e-4);
}

#[test]
fn zero_depth_vibrato_keeps_pitch_steady() {
    let instrument = InstrumentData::wavetable(WavetableSource::new(40)).with_vibrato(VibratoParams {
        delay: 0,
        speed: 5,
        depth: 0,
    });
    let (mut ctx, voice) = context_with(instrument, ONE_FRAME_PER_TICK);
    ctx.note_on(voice, 60, 127);

    let start = ctx.voice(voice).unwrap().oscillator().increment();
    for _ in 0..50 {
        render_ticks(&mut ctx, voice, 1);
        assert_eq!(ctx.voice(voice).unwrap().pitch_offset().cents, 0.0);
        assert_eq!(ctx.voice(voice).unwrap().oscillator().increment(), start);
    }
}

#[test]
fn vibrato_waits_for_its_delay() {
    let instrument = InstrumentData::wavetable(WavetableSource::new(40)).with_vibrato(VibratoParams {
        delay: 5,
        speed: 4,
        depth: 30,
    });
    let (mut ctx, voice) = context_with(instrument, ONE_FRAME_PER_TICK);
    ctx.note_on(voice, 60, 127);

    render_ticks(&mut ctx, voice, 5);
    assert_eq!(ctx.voice(voice).unwrap().pitch_offset().cents, 0.0);
    render_ticks(&mut ctx, voice, 1);
    assert!(ctx.voice(voice).unwrap().pitch_offset().cents > 0.0);
}

#[test]
fn wave_sequencer_switches_waves() {
    let source = WavetableSource::new(0).with_sequence(
        2,
        &[
            SequencerStep::new(16, 0),
            SequencerStep::new(32, 0),
            SequencerStep::new(40, 0),
        ],
    );
    let (mut ctx, voice) = context_with(InstrumentData::wavetable(source), ONE_FRAME_PER_TICK);
    ctx.note_on(voice, 60, 127);

    let mut waves = Vec::new();
    for _ in 0..4 {
        render_ticks(&mut ctx, voice, 2);
        match ctx.voice(voice).unwrap().oscillator() {
            Oscillator::Wavetable(osc) => waves.push(osc.wave()),
            Oscillator::Pcm(_) => panic!("expected wavetable oscillator"),
        }
    }
    assert_eq!(waves, vec![32, 40, 16, 32]);
}

#[test]
fn sustain_ticks_param_releases_without_note_off() {
    let instrument = InstrumentData::wavetable(WavetableSource::new(16));
    let (mut ctx, voice) = context_with(instrument, ONE_FRAME_PER_TICK);
    ctx.set_param(voice, ParamId::SustainTicks.id(), 10.0 / 255.0);
    ctx.note_on(voice, 60, 127);

    render_ticks(&mut ctx, voice, 12 + 10);
    assert_eq!(
        ctx.voice(voice).unwrap().envelope_state(),
        EnvelopeState::Release
    );
    render_ticks(&mut ctx, voice, 8);
    assert!(!ctx.voice(voice).unwrap().is_active());
}

#[test]
fn independent_contexts_do_not_interact() {
    let instrument = InstrumentData::wavetable(WavetableSource::new(40));
    let (mut a, voice_a) = context_with(instrument.clone(), 44_100);
    let (mut b, voice_b) = context_with(instrument, 44_100);

    a.note_on(voice_a, 60, 127);
    let out = render_ticks(&mut a, voice_a, 2_000);
    assert!(out.iter().any(|&s| s != 0.0));

    let silent = render_ticks(&mut b, voice_b, 2_000);
    assert!(silent.iter().all(|&s| s == 0.0));
}
