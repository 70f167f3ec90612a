use crate::Message;
use hidcore::poller::SignalHistory;
use iced::{
    mouse,
    widget::canvas::{self, Cache, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Theme,
};

/// Fixed y-axis range of the chart in dBm.
pub const Y_MIN_DBM: f32 = -100.0;
pub const Y_MAX_DBM: f32 = 0.0;

/// Stepped line of the bandit signal history.
///
/// Geometry lives in a cache owned by the dashboard, which clears it only
/// when the history received a new sample.
pub struct SignalChart<'a> {
    pub history: &'a SignalHistory,
    pub cache: &'a Cache,
}

impl canvas::Program<Message> for SignalChart<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(
                Point::ORIGIN,
                bounds.size(),
                Color::from_rgb(0.05, 0.05, 0.05),
            );

            let samples: Vec<i64> = self.history.iter().collect();
            let points = stepped_points(&samples, bounds.width, bounds.height);
            if points.len() < 2 {
                return;
            }
            let path = Path::new(|builder| {
                builder.move_to(points[0]);
                for point in &points[1..] {
                    builder.line_to(*point);
                }
            });
            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgb(0.18, 0.72, 0.89)),
            );
        });

        vec![geometry]
    }
}

fn y_for(dbm: i64, height: f32) -> f32 {
    let clamped = (dbm as f32).clamp(Y_MIN_DBM, Y_MAX_DBM);
    (Y_MAX_DBM - clamped) / (Y_MAX_DBM - Y_MIN_DBM) * height
}

/// Vertices of a step line: each sample holds until the next one starts.
fn stepped_points(samples: &[i64], width: f32, height: f32) -> Vec<Point> {
    if samples.len() < 2 {
        return samples
            .iter()
            .map(|dbm| Point::new(0.0, y_for(*dbm, height)))
            .collect();
    }
    let step = width / (samples.len() as f32 - 1.0);
    let mut points = Vec::with_capacity(samples.len() * 2);
    points.push(Point::new(0.0, y_for(samples[0], height)));
    for (i, pair) in samples.windows(2).enumerate() {
        let x = (i + 1) as f32 * step;
        points.push(Point::new(x, y_for(pair[0], height)));
        points.push(Point::new(x, y_for(pair[1], height)));
    }
    points
}
