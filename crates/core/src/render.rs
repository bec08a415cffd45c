//! Renderer seam. Renderers own drawing, timing and transitions; the core only
//! walks them through a [`Script`] in playback order.

use crate::script::{Script, Slide};

/// Consumer of an assembled script.
pub trait SlideRenderer {
    /// Error type surfaced by the renderer.
    type Error;

    /// Called once before the first slide.
    fn begin(&mut self, _title: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Present one slide. `previous` is the slide on screen before it, which a
    /// `transform` transition morphs from.
    fn slide(&mut self, slide: &Slide, previous: Option<&Slide>) -> Result<(), Self::Error>;

    /// Called once after the last slide.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<R: SlideRenderer + ?Sized> SlideRenderer for &mut R {
    type Error = R::Error;

    fn begin(&mut self, title: &str) -> Result<(), Self::Error> {
        (**self).begin(title)
    }

    fn slide(&mut self, slide: &Slide, previous: Option<&Slide>) -> Result<(), Self::Error> {
        (**self).slide(slide, previous)
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        (**self).finish()
    }
}

impl Script {
    /// Drive `renderer` through every slide, stopping at its first error.
    pub fn play<R: SlideRenderer>(&self, mut renderer: R) -> Result<(), R::Error> {
        renderer.begin(&self.title)?;
        let mut previous = None;
        for slide in &self.slides {
            renderer.slide(slide, previous)?;
            previous = Some(slide);
        }
        renderer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        fail_on: Option<u32>,
    }

    impl SlideRenderer for Recorder {
        type Error = String;

        fn begin(&mut self, title: &str) -> Result<(), String> {
            self.events.push(format!("begin {title}"));
            Ok(())
        }

        fn slide(&mut self, slide: &Slide, previous: Option<&Slide>) -> Result<(), String> {
            if self.fail_on == Some(slide.step) {
                return Err(format!("cannot draw step {}", slide.step));
            }
            let from = previous.map_or("none".to_string(), |p| p.step.to_string());
            self.events
                .push(format!("{} from {} via {}", slide.step, from, slide.transition));
            Ok(())
        }

        fn finish(&mut self) -> Result<(), String> {
            self.events.push("finish".to_string());
            Ok(())
        }
    }

    const DOC: &str = "# Demo\n``` @step2\nb\n```\n``` @step1 @transform\na\n```";

    #[test]
    fn plays_slides_in_script_order() {
        let script = assemble(DOC).unwrap().script;
        let mut recorder = Recorder::default();
        script.play(&mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec![
                "begin Demo",
                "2 from none via crossfade",
                "1 from 2 via transform",
                "finish"
            ]
        );
    }

    #[test]
    fn stops_at_first_renderer_error() {
        let script = assemble(DOC).unwrap().script;
        let mut recorder = Recorder {
            fail_on: Some(1),
            ..Recorder::default()
        };
        let err = script.play(&mut recorder).unwrap_err();
        assert_eq!(err, "cannot draw step 1");
        assert_eq!(recorder.events, vec!["begin Demo", "2 from none via crossfade"]);
    }
}
